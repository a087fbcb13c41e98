use actix_web::{Scope, web};
use imobi_content::{
    BannerService, BrokerService, ChamadaService, ContentPageService, SiteConfigService,
    SlideService,
};

use crate::{resource, submission};

/// Admin JSON API, mounted at `/admin/api`
pub fn routes() -> Scope {
    web::scope("/admin/api")
        .service(resource::scope::<BannerService>("/banners"))
        .service(resource::scope::<SlideService>("/slides"))
        .service(resource::scope::<ChamadaService>("/chamadas"))
        .service(resource::scope::<ContentPageService>("/paginas"))
        .service(resource::scope::<BrokerService>("/corretores"))
        .service(resource::scope::<SiteConfigService>("/configuracao"))
        .service(submission::routes())
}
