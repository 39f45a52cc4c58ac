//! Admin API 预设管理

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, Result as ActixResult, web};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, trace};

use crate::services::{Preset, PresetStore};
use crate::utm::{sanitize_key, sanitize_text_field};

use super::error_code::ErrorCode;
use super::helpers::{api_result, error_response, success_response};
use super::types::CreatePresetRequest;

#[derive(Serialize)]
struct PresetSaved {
    id: String,
    preset: Preset,
}

fn invalid_parameters() -> HttpResponse {
    error_response(
        StatusCode::BAD_REQUEST,
        ErrorCode::InvalidParameters,
        "Invalid parameters.",
    )
}

async fn save_preset(store: &PresetStore, id: &str, data: Map<String, Value>) -> HttpResponse {
    let id = sanitize_text_field(id);
    if id.is_empty() || data.is_empty() {
        return invalid_parameters();
    }

    // 未知字段直接丢弃
    let preset: Preset = match serde_json::from_value(Value::Object(data)) {
        Ok(p) => p,
        Err(e) => {
            trace!("Admin API: preset payload rejected: {}", e);
            return invalid_parameters();
        }
    };

    info!("Admin API: saving preset {}", id);
    api_result(
        store
            .upsert(&id, &preset)
            .await
            .map(|(id, preset)| PresetSaved { id, preset }),
    )
}

/// 获取全部预设
pub async fn get_presets(
    _req: HttpRequest,
    store: web::Data<Arc<PresetStore>>,
) -> ActixResult<impl Responder> {
    trace!("Admin API: list presets");
    Ok(api_result(store.list().await))
}

/// 获取单个预设
pub async fn get_preset(
    _req: HttpRequest,
    path: web::Path<String>,
    store: web::Data<Arc<PresetStore>>,
) -> ActixResult<impl Responder> {
    let id = sanitize_text_field(&path.into_inner());
    trace!("Admin API: get preset {}", id);

    Ok(match store.get(&id).await {
        Ok(Some(preset)) => success_response(preset),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::PresetNotFound,
            "Preset not found.",
        ),
        Err(e) => api_result::<(), _>(Err(e)),
    })
}

/// 新建预设 `{id, preset}`
pub async fn create_preset(
    _req: HttpRequest,
    body: web::Json<CreatePresetRequest>,
    store: web::Data<Arc<PresetStore>>,
) -> ActixResult<impl Responder> {
    let CreatePresetRequest { id, preset } = body.into_inner();
    let (Some(id), Some(preset)) = (id, preset) else {
        return Ok(invalid_parameters());
    };

    Ok(save_preset(&store, &id, preset).await)
}

/// 覆盖指定预设，请求体就是预设本身
pub async fn update_preset(
    _req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<Map<String, Value>>,
    store: web::Data<Arc<PresetStore>>,
) -> ActixResult<impl Responder> {
    Ok(save_preset(&store, &path.into_inner(), body.into_inner()).await)
}

/// 删除预设（已生成的链接保留）
pub async fn delete_preset(
    _req: HttpRequest,
    path: web::Path<String>,
    store: web::Data<Arc<PresetStore>>,
) -> ActixResult<impl Responder> {
    let id = sanitize_key(&path.into_inner());
    if id.is_empty() {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::PresetInvalidId,
            "Invalid preset ID.",
        ));
    }

    info!("Admin API: deleting preset {}", id);
    Ok(api_result(
        store
            .delete(&id)
            .await
            .map(|_| serde_json::json!({ "id": id })),
    ))
}
