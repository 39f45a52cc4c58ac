pub mod content_item;
pub mod item_meta;
pub mod site_option;

pub use content_item::Entity as ContentItemEntity;
pub use item_meta::Entity as ItemMetaEntity;
pub use site_option::Entity as SiteOptionEntity;
