//! OpenAPI configuration.

use crate::feature::{
    info::info_api,
    item::{item_api, item_repository, item_validation},
};
use utoipa::OpenApi;

/// OpenApi configuration.
#[derive(OpenApi)]
#[openapi(
    paths(
        info_api::ping,
        info_api::info,
        item_api::list_items,
        item_api::get_item,
        item_api::create_item,
        item_api::update_item,
        item_api::delete_item,
    ),
    components(schemas(
        info_api::Ping,
        info_api::AppInfo,
        item_repository::Item,
        item_validation::ItemPayload,
        crate::infra::error::ErrorBody,
        crate::infra::error::ValidationError,
        crate::infra::error::ValidationErrorBody,
    ))
)]
#[derive(Clone, Copy, Debug)]
pub struct ApiDoc;
