use crate::dtos::{DeleteResponse, ItemResponse};
use crate::error::AppError;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use serde_json::{Map, Value};

/// `:id` path segments are 24-hex ObjectIds. A malformed id is reported the
/// same way as any other storage failure (500); existing clients depend on
/// that status, so it is not mapped to a 400 here.
fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|e| {
        tracing::error!(id = %id, "Malformed item id: {}", e);
        AppError::DatabaseError(anyhow::anyhow!("malformed object id: {}", e))
    })
}

fn to_bson_document(body: &Map<String, Value>) -> Result<Document, AppError> {
    mongodb::bson::to_document(body)
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Bad Request: {}", e)))
}

pub async fn list_items(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut cursor = state.db.items().find(doc! {}, None).await.map_err(|e| {
        tracing::error!("Error fetching items: {}", e);
        AppError::from(e)
    })?;

    let mut items = Vec::new();
    while let Some(doc) = cursor.try_next().await.map_err(AppError::from)? {
        items.push(ItemResponse::from(doc));
    }

    Ok(Json(items))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let oid = parse_object_id(&id)?;

    let item = state
        .db
        .items()
        .find_one(doc! { "_id": oid }, None)
        .await
        .map_err(|e| {
            tracing::error!(id = %id, "Error fetching item: {}", e);
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Item not found")))?;

    Ok(Json(ItemResponse::from(item)))
}

pub async fn create_item(
    State(state): State<AppState>,
    body: Option<Json<Map<String, Value>>>,
) -> Result<impl IntoResponse, AppError> {
    // The only validation on writes: the payload must be a non-empty mapping.
    let body = match body {
        Some(Json(body)) if !body.is_empty() => body,
        _ => {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Bad Request: Body cannot be empty"
            )))
        }
    };

    let mut item = to_bson_document(&body)?;

    let result = state.db.items().insert_one(&item, None).await.map_err(|e| {
        tracing::error!("Error saving item: {}", e);
        AppError::from(e)
    })?;

    item.insert("_id", result.inserted_id);
    let created = ItemResponse::from(item);

    tracing::info!(item_id = %created.id, "Item created");

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<Map<String, Value>>>,
) -> Result<impl IntoResponse, AppError> {
    let body = match body {
        Some(Json(body)) if !body.is_empty() => body,
        _ => {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Bad Request: Body cannot be empty"
            )))
        }
    };

    let update = to_bson_document(&body)?;
    let oid = parse_object_id(&id)?;

    // Partial field replacement: fields not named in the body survive.
    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();

    let updated = state
        .db
        .items()
        .find_one_and_update(doc! { "_id": oid }, doc! { "$set": update }, options)
        .await
        .map_err(|e| {
            tracing::error!(id = %id, "Error updating item: {}", e);
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Item not found")))?;

    Ok(Json(ItemResponse::from(updated)))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let oid = parse_object_id(&id)?;

    let result = state
        .db
        .items()
        .delete_one(doc! { "_id": oid }, None)
        .await
        .map_err(|e| {
            tracing::error!(id = %id, "Error deleting item: {}", e);
            AppError::from(e)
        })?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound(anyhow::anyhow!("Item not found")));
    }

    tracing::info!(item_id = %id, "Item deleted");

    Ok(Json(DeleteResponse {
        message: "Item deleted successfully".to_string(),
    }))
}
