//! HTTP handlers for the review API

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
};
use md_review_engine::selection::{SelectionPoint, TextSelection};
use md_review_engine::{
    Comment, CommentDraft, CommentId, Feedback, FolderNode, LineRange, RenderTree, io,
    resolve_selection,
};
use md_review_engine::render::NodeId;
use relative_path::RelativePath;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::error::ApiError;
use super::models::*;
use super::page;
use super::state::{AppState, Source};

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let title = state.review().session.mode().label().to_string();
    Html(page::render(&title))
}

pub async fn document(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DocumentPayload>, ApiError> {
    let mode = state.review().session.mode().clone();
    let payload = match &state.source {
        Source::File { .. } => {
            let file = load_file(&state, mode.label()).await?;
            DocumentPayload {
                mode,
                first_file: None,
                file: Some(file),
            }
        }
        Source::Folder { tree, .. } => DocumentPayload {
            mode,
            first_file: tree.first_file().map(|p| p.to_string()),
            file: None,
        },
    };
    Ok(Json(payload))
}

pub async fn tree(State(state): State<Arc<AppState>>) -> Result<Json<FolderNode>, ApiError> {
    state
        .tree()
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("not serving a folder".to_string()))
}

pub async fn file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FileQuery>,
) -> Result<Json<FilePayload>, ApiError> {
    Ok(Json(load_file(&state, &query.path).await?))
}

/// Reads and renders `path`, making it the active file.
///
/// The session lock is released while the file is read; if another load
/// begins meanwhile this one fails with `Superseded`.
async fn load_file(state: &Arc<AppState>, path: &str) -> Result<FilePayload, ApiError> {
    if let Source::Folder { root, tree } = &state.source {
        io::resolve_markdown_path(root, path)?;
        if !tree.contains_file(RelativePath::new(path)) {
            return Err(md_review_engine::ReviewError::UnknownFile(path.to_string()).into());
        }
    }

    let ticket = state.review().begin_load(path)?;

    let reader = Arc::clone(state);
    let requested = path.to_string();
    let file = tokio::task::spawn_blocking(move || match &reader.source {
        Source::File { path } => io::read_single(path),
        Source::Folder { root, .. } => io::read_markdown(root, &requested),
    })
    .await
    .map_err(anyhow::Error::from)??;

    let mut review = state.review();
    let document = review.session.complete_load(&ticket, file.content())?;
    let payload = FilePayload {
        raw_markdown: file.content().to_string(),
        filename: path.to_string(),
        html: document.html(),
        generation: ticket.generation(),
        commented_lines: review.session.commented_start_lines(path).into_iter().collect(),
    };
    log::debug!(
        "Loaded {} (generation {}): {} blocks annotated, {} unmatched",
        ticket.path(),
        ticket.generation(),
        document.report.matched,
        document.report.unmatched
    );
    review.document = Some(document);
    Ok(payload)
}

pub async fn list_comments(State(state): State<Arc<AppState>>) -> Json<Vec<Comment>> {
    let review = state.review();
    Json(review.session.comments().into_iter().cloned().collect())
}

fn block_at_line(tree: &RenderTree, line: usize) -> Option<NodeId> {
    tree.preorder()
        .into_iter()
        .find(|&n| tree.lines(n).is_some_and(|r| r.start_line == line))
}

/// Follows element-child indices down from `block`, stopping early where the
/// page's DOM has elements the render tree lacks (rendered diagrams).
fn descend(tree: &RenderTree, block: NodeId, path: &[usize]) -> NodeId {
    let mut node = block;
    for &index in path {
        let child = tree
            .children(node)
            .iter()
            .copied()
            .filter(|&c| tree.tag(c).is_some())
            .nth(index);
        match child {
            Some(child) => node = child,
            None => break,
        }
    }
    node
}

fn selection_point(tree: &RenderTree, end: &SelectionEnd) -> Option<SelectionPoint> {
    let block = block_at_line(tree, end.line)?;
    Some(SelectionPoint::new(descend(tree, block, &end.path), end.offset))
}

/// Resolves a browser selection against the active document and makes it
/// the pending selection. Unresolvable selections clear it and return null.
pub async fn select(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectionRequest>,
) -> Json<Option<PendingPayload>> {
    let mut review = state.review();
    let pending = review.document.as_ref().and_then(|doc| {
        let tree = &doc.tree;
        let selection = TextSelection {
            anchor: selection_point(tree, &req.anchor)?,
            focus: selection_point(tree, &req.focus)?,
            text: req.text.clone(),
            bounding_rect: req.bounding_rect,
        };
        resolve_selection(tree, tree.root(), &selection)
    });
    let payload = pending.as_ref().map(PendingPayload::from);
    review.session.set_pending(pending);
    Json(payload)
}

pub async fn clear_selection(State(state): State<Arc<AppState>>) -> StatusCode {
    state.review().session.clear_pending();
    StatusCode::NO_CONTENT
}

pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let mut review = state.review();
    let session = &mut review.session;

    let id = match req.start_line {
        Some(start_line) => {
            let filename = req
                .filename
                .or_else(|| session.active_file().map(str::to_string))
                .ok_or_else(|| ApiError::InvalidRequest("no file is open".to_string()))?;
            let end_line = req.end_line.unwrap_or(start_line).max(start_line);
            let lines = LineRange::new(start_line, end_line);
            session.add_comment(CommentDraft::new(filename, lines, req.context, req.text))?
        }
        None => session.save_comment(&req.text)?,
    };

    let comment = session
        .store()
        .get(id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(id.to_string()))?;
    log::info!("Added comment on {} {}", comment.filename, comment.lines().label());
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn edit_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CommentId>,
    Json(body): Json<TextBody>,
) -> Result<Json<Comment>, ApiError> {
    let mut review = state.review();
    review.session.edit_comment(id, &body.text)?;
    review
        .session
        .store()
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(id.to_string()))
}

pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CommentId>,
) -> Result<StatusCode, ApiError> {
    state.review().session.delete_comment(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_general(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TextBody>,
) -> StatusCode {
    state.review().session.set_general(&body.text);
    StatusCode::NO_CONTENT
}

/// Comment count per file, for the sidebar badges.
pub async fn comment_counts(State(state): State<Arc<AppState>>) -> Json<BTreeMap<String, usize>> {
    Json(state.review().session.comment_counts())
}

/// The transcript as it stands, without ending the review.
pub async fn preview(State(state): State<Arc<AppState>>) -> Json<Feedback> {
    Json(state.review().session.finish())
}

/// Formats the transcript from the server-side comments and ends the review.
pub async fn finish(State(state): State<Arc<AppState>>) -> Json<Feedback> {
    let feedback = state.review().session.finish();
    state.complete(feedback.clone());
    Json(feedback)
}

/// Accepts a transcript formatted by the page. The body is parsed as JSON
/// whatever its content type.
pub async fn done(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<Value>, ApiError> {
    let feedback: Feedback = serde_json::from_str(&body)
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid feedback body: {e}")))?;
    let accepted = state.complete(feedback);
    Ok(Json(json!({ "ok": accepted })))
}
