//! HTTP handler functions for the GlobeTrotter API.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use actix_web::{HttpResponse, web};
use globetrotter_images::ImageTables;
use globetrotter_server_models::{
    ApiCityPage, ApiError, ApiHealth, ApiImageResolution, ApiRefreshResult, CityQueryParams,
    DEFAULT_CITY_LIMIT, ImageFallbackParams, ImageResolveParams,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/cities`
///
/// Returns a page of the catalog in ranking order.
pub async fn cities(
    state: web::Data<AppState>,
    params: web::Query<CityQueryParams>,
) -> HttpResponse {
    let catalog = match read(&state.catalog) {
        Ok(catalog) => catalog,
        Err(response) => return response,
    };

    let offset = params.offset.unwrap_or(0);
    let limit = params.limit.unwrap_or(DEFAULT_CITY_LIMIT);
    let cities: Vec<_> = catalog
        .records()
        .iter()
        .skip(offset)
        .take(limit)
        .cloned()
        .collect();
    let total_count = catalog.len();
    let has_more = offset.saturating_add(cities.len()) < total_count;

    HttpResponse::Ok().json(ApiCityPage {
        cities,
        total_count,
        has_more,
    })
}

/// `GET /api/cities/featured`
pub async fn featured(state: web::Data<AppState>) -> HttpResponse {
    match read(&state.catalog) {
        Ok(catalog) => HttpResponse::Ok().json(catalog.featured()),
        Err(response) => response,
    }
}

/// `GET /api/cities/{id}`
pub async fn city(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let Ok(id) = path.parse::<u32>() else {
        return HttpResponse::BadRequest().json(ApiError::new(format!(
            "Invalid city id: {}",
            path.as_str()
        )));
    };

    let catalog = match read(&state.catalog) {
        Ok(catalog) => catalog,
        Err(response) => return response,
    };

    catalog.get(id).map_or_else(
        || HttpResponse::NotFound().json(ApiError::new(format!("City {id} not found"))),
        |record| HttpResponse::Ok().json(record),
    )
}

/// `GET /api/catalog/summary`
pub async fn summary(state: web::Data<AppState>) -> HttpResponse {
    let resolver = match read(&state.resolver) {
        Ok(resolver) => resolver,
        Err(response) => return response,
    };
    let catalog = match read(&state.catalog) {
        Ok(catalog) => catalog,
        Err(response) => return response,
    };

    HttpResponse::Ok().json(catalog.summary(&resolver, &state.aggregation))
}

/// `GET /api/images/resolve`
pub async fn resolve_image(
    state: web::Data<AppState>,
    params: web::Query<ImageResolveParams>,
) -> HttpResponse {
    match read(&state.resolver) {
        Ok(resolver) => HttpResponse::Ok().json(ApiImageResolution::new(
            params.city.as_str(),
            resolver.resolve_with_source(&params.city),
        )),
        Err(response) => response,
    }
}

/// `GET /api/images/fallback`
///
/// Returns the image to try after `tried` failed to load.
pub async fn fallback_image(
    state: web::Data<AppState>,
    params: web::Query<ImageFallbackParams>,
) -> HttpResponse {
    match read(&state.resolver) {
        Ok(resolver) => HttpResponse::Ok().json(ApiImageResolution::new(
            params.city.as_str(),
            resolver.resolve_fallback_with_source(&params.city, &params.tried),
        )),
        Err(response) => response,
    }
}

/// `POST /api/images/refresh`
///
/// Reloads the image tables from the configured path (or keeps the current
/// ones) and re-resolves every record's image url. The file is read on the
/// blocking pool before any lock is taken, and the swap happens only once
/// both write guards are held.
pub async fn refresh_images(state: web::Data<AppState>) -> HttpResponse {
    let reloaded = match state.config.image_tables_path.clone() {
        Some(path) => match web::block(move || ImageTables::load(&path)).await {
            Ok(Ok(tables)) => Some(tables),
            Ok(Err(e)) => {
                log::error!("Failed to reload image tables: {e}");
                return HttpResponse::InternalServerError()
                    .json(ApiError::new("Failed to reload image tables"));
            }
            Err(e) => {
                log::error!("Image table reload did not complete: {e}");
                return HttpResponse::InternalServerError()
                    .json(ApiError::new("Failed to reload image tables"));
            }
        },
        None => None,
    };

    let mut resolver = match write(&state.resolver) {
        Ok(resolver) => resolver,
        Err(response) => return response,
    };
    let mut catalog = match write(&state.catalog) {
        Ok(catalog) => catalog,
        Err(response) => return response,
    };

    let tables = reloaded.unwrap_or_else(|| resolver.tables().clone());
    resolver.replace_tables(tables);
    let updated = catalog.refresh(&resolver);
    log::info!("Image refresh updated {updated} of {} records", catalog.len());

    HttpResponse::Ok().json(ApiRefreshResult {
        updated,
        total_count: catalog.len(),
    })
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, HttpResponse> {
    lock.read().map_err(|e| {
        log::error!("State lock poisoned: {e}");
        HttpResponse::InternalServerError().json(ApiError::new("Catalog state unavailable"))
    })
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, HttpResponse> {
    lock.write().map_err(|e| {
        log::error!("State lock poisoned: {e}");
        HttpResponse::InternalServerError().json(ApiError::new("Catalog state unavailable"))
    })
}
