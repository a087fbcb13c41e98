//! imobi Content - Site content services and lead capture
//!
//! This crate provides:
//! - The [`AdminResource`] contract implemented by every back-office table
//! - Services for banners, slides, chamadas, content pages, brokers and the
//!   site configuration, including the public read paths used by the pages
//! - Lead capture for the public forms

pub mod banner;
pub mod broker;
pub mod chamada;
pub mod lead;
pub mod page;
pub mod resource;
pub mod site_config;
pub mod slide;
pub mod validation;

pub use banner::{BannerForm, BannerService};
pub use broker::{BrokerForm, BrokerService};
pub use chamada::{ChamadaForm, ChamadaService};
pub use lead::{FormKind, LeadForm};
pub use page::{ContentPageForm, ContentPageService};
pub use resource::AdminResource;
pub use site_config::{SiteConfigForm, SiteConfigService};
pub use slide::{SlideForm, SlideService};

#[cfg(test)]
pub(crate) mod testing {
    use imobi_persistence::create_schema;
    use sea_orm::{ConnectOptions, Database, DatabaseConnection};

    pub async fn memory_db() -> DatabaseConnection {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opts).await.unwrap();
        create_schema(&db).await.unwrap();
        db
    }
}
