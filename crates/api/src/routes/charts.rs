//! Chart-of-accounts routes.
//!
//! A chart is edited as a whole forest: GET returns the stored forest
//! as a flat adjacency list in pre-order, PUT replaces it atomically.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ledgerbook_core::chart::{AccountType, ChartNode, ChartTree};
use ledgerbook_db::repositories::{ChartRepoError, ChartRepository};
use ledgerbook_shared::AppError;
use ledgerbook_shared::types::ChartNodeId;

use crate::AppState;
use crate::error::ApiError;

/// Creates the chart routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/charts/{type}",
        get(load_chart).put(save_chart).delete(remove_chart),
    )
}

/// One chart node on the wire. Rows arrive and leave in pre-order,
/// parents before children.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChartNodeDto {
    /// Node id; the client generates ids for new nodes.
    pub id: Uuid,
    /// Node name.
    pub name: String,
    /// Parent node id; absent for roots.
    pub parent_id: Option<Uuid>,
}

/// A whole chart forest on the wire.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChartDto {
    /// Statement type of the forest.
    pub account_type: String,
    /// Nodes in pre-order.
    pub nodes: Vec<ChartNodeDto>,
}

fn parse_type(raw: &str) -> Result<AccountType, ApiError> {
    raw.parse::<AccountType>()
        .map_err(|e| ApiError(AppError::BusinessRule(e)))
}

async fn load_chart(
    State(state): State<AppState>,
    Path(raw_type): Path<String>,
) -> Result<Json<ChartDto>, ApiError> {
    let account_type = parse_type(&raw_type)?;
    let repo = ChartRepository::new((*state.db).clone());
    let tree = repo.load(account_type).await?;
    if tree.roots().is_empty() {
        return Err(ChartRepoError::NotFound(account_type).into());
    }

    let nodes = tree
        .preorder()
        .into_iter()
        .map(|node| ChartNodeDto {
            id: node.id.into_inner(),
            name: node.name.clone(),
            parent_id: node.parent_id.map(ChartNodeId::into_inner),
        })
        .collect();

    Ok(Json(ChartDto {
        account_type: account_type.to_string(),
        nodes,
    }))
}

async fn save_chart(
    State(state): State<AppState>,
    Path(raw_type): Path<String>,
    Json(body): Json<ChartDto>,
) -> Result<Json<ChartDto>, ApiError> {
    let account_type = parse_type(&raw_type)?;

    let nodes: Vec<ChartNode> = body
        .nodes
        .into_iter()
        .map(|dto| ChartNode {
            id: ChartNodeId::from_uuid(dto.id),
            name: dto.name,
            account_type,
            parent_id: dto.parent_id.map(ChartNodeId::from_uuid),
        })
        .collect();
    let tree = ChartTree::from_nodes(account_type, nodes)?;

    let repo = ChartRepository::new((*state.db).clone());
    repo.save(&tree).await?;

    let saved = repo.load(account_type).await?;
    Ok(Json(ChartDto {
        account_type: account_type.to_string(),
        nodes: saved
            .preorder()
            .into_iter()
            .map(|node| ChartNodeDto {
                id: node.id.into_inner(),
                name: node.name.clone(),
                parent_id: node.parent_id.map(ChartNodeId::into_inner),
            })
            .collect(),
    }))
}

async fn remove_chart(
    State(state): State<AppState>,
    Path(raw_type): Path<String>,
) -> Result<StatusCode, ApiError> {
    let account_type = parse_type(&raw_type)?;
    let repo = ChartRepository::new((*state.db).clone());
    repo.remove(account_type).await?;
    Ok(StatusCode::NO_CONTENT)
}
