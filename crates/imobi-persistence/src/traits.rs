//! Column accessors that let the bulk helpers work across entities

use sea_orm::EntityTrait;

use crate::entity::{
    banner, broker, chamada, content_page, form_submission, site_config, slide,
};

/// Entity with an integer primary key
pub trait KeyedEntity: EntityTrait {
    fn id_column() -> Self::Column;
}

/// Entity carrying an activation flag and a modification timestamp
pub trait StatusEntity: KeyedEntity {
    fn status_column() -> Self::Column;

    fn updated_at_column() -> Self::Column;
}

macro_rules! keyed_entity {
    ($($module:ident),+ $(,)?) => {
        $(
            impl KeyedEntity for $module::Entity {
                fn id_column() -> Self::Column {
                    $module::Column::Id
                }
            }
        )+
    };
}

macro_rules! status_entity {
    ($($module:ident),+ $(,)?) => {
        $(
            impl StatusEntity for $module::Entity {
                fn status_column() -> Self::Column {
                    $module::Column::Status
                }

                fn updated_at_column() -> Self::Column {
                    $module::Column::AtualizadoEm
                }
            }
        )+
    };
}

keyed_entity!(
    banner,
    slide,
    chamada,
    content_page,
    broker,
    site_config,
    form_submission
);
status_entity!(banner, slide, chamada, content_page, broker, site_config);
