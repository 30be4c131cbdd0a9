use askama::Template;
use axum::extract::{Multipart, Path, State};
use axum::response::Response;

use crate::db::models::Post;
use crate::db::posts;
use crate::error::{AppError, AppResult};
use crate::extractors::SessionUser;
use crate::flash::{self, Flash, FlashMessage};
use crate::routes::Html;
use crate::state::AppState;
use crate::uploads::{store_upload, UploadError};

#[derive(Template)]
#[template(path = "pages/index.html")]
pub struct IndexTemplate {
    pub user: Option<String>,
    pub messages: Vec<FlashMessage>,
    pub posts: Vec<Post>,
}

#[derive(Template)]
#[template(path = "pages/create.html")]
pub struct CreateTemplate {
    pub user: Option<String>,
    pub messages: Vec<FlashMessage>,
}

#[derive(Template)]
#[template(path = "pages/edit.html")]
pub struct EditTemplate {
    pub user: Option<String>,
    pub messages: Vec<FlashMessage>,
    pub post: Post,
}

/// GET / - the post feed, newest first
pub async fn index(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Flash(messages): Flash,
) -> AppResult<Response> {
    let posts = posts::list_all(&state.db)?;
    let had_messages = !messages.is_empty();
    Ok(flash::displayed(
        had_messages,
        Html(IndexTemplate {
            user,
            messages,
            posts,
        }),
    ))
}

/// GET /create - new post form
pub async fn create_form(
    SessionUser(user): SessionUser,
    Flash(messages): Flash,
) -> AppResult<Response> {
    let had_messages = !messages.is_empty();
    Ok(flash::displayed(
        had_messages,
        Html(CreateTemplate { user, messages }),
    ))
}

/// POST /create - validate, store an optional photo, insert the post
pub async fn create(State(state): State<AppState>, multipart: Multipart) -> AppResult<Response> {
    let form = read_post_form(multipart).await?;
    let mut messages = Vec::new();

    if form.title.trim().is_empty() || form.content.trim().is_empty() {
        messages.push(flash::error("Title and content are required."));
        return Ok(flash::redirect("/create", messages));
    }

    let image_url = save_photo(&state, form.photo, &mut messages);

    match posts::create(&state.db, &form.title, &form.content, image_url.as_deref()) {
        Ok(_) => messages.push(flash::success("Post created successfully!")),
        Err(e) => {
            tracing::error!("Failed to create post: {}", e);
            messages.push(flash::error(format!("Database error: {}", e)));
        }
    }

    Ok(flash::redirect("/", messages))
}

/// GET /{id}/edit/ - edit form prefilled with the stored post
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    SessionUser(user): SessionUser,
    Flash(messages): Flash,
) -> AppResult<Response> {
    let post = posts::get(&state.db, id)?;
    let had_messages = !messages.is_empty();
    Ok(flash::displayed(
        had_messages,
        Html(EditTemplate {
            user,
            messages,
            post,
        }),
    ))
}

/// POST /{id}/edit/ - overwrite title/content; replace the image only if
/// a new valid photo was supplied
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> AppResult<Response> {
    posts::get(&state.db, id)?;

    let form = read_post_form(multipart).await?;
    let mut messages = Vec::new();

    if form.title.trim().is_empty() || form.content.trim().is_empty() {
        messages.push(flash::error("Title and content are required."));
        return Ok(flash::redirect(&format!("/{}/edit/", id), messages));
    }

    let new_image = save_photo(&state, form.photo, &mut messages);

    match posts::update(&state.db, id, &form.title, &form.content, new_image.as_deref()) {
        Ok(()) => messages.push(flash::success("Post updated successfully!")),
        Err(e) => {
            tracing::error!("Failed to update post {}: {}", id, e);
            messages.push(flash::error(format!("Database error: {}", e)));
        }
    }

    Ok(flash::redirect("/", messages))
}

/// POST /{id}/delete/
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Response> {
    let post = posts::get(&state.db, id)?;
    posts::delete(&state.db, id)?;

    Ok(flash::redirect(
        "/",
        vec![flash::success(format!(
            "\"{}\" was successfully deleted!",
            post.title
        ))],
    ))
}

struct PostForm {
    title: String,
    content: String,
    photo: Option<(String, Vec<u8>)>,
}

async fn read_post_form(mut multipart: Multipart) -> Result<PostForm, AppError> {
    let mut form = PostForm {
        title: String::new(),
        content: String::new(),
        photo: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => {
                form.title = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
            }
            "content" => {
                form.content = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
            }
            "photo" => {
                // Browsers send the part with an empty filename when no
                // file was picked.
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if !filename.is_empty() {
                    form.photo = Some((filename, bytes.to_vec()));
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Persist the submitted photo if there is one. A rejected or failed
/// upload flashes an error but does not abort the post write.
fn save_photo(
    state: &AppState,
    photo: Option<(String, Vec<u8>)>,
    messages: &mut Vec<FlashMessage>,
) -> Option<String> {
    let (filename, bytes) = photo?;
    match store_upload(state.config.uploads_path(), &filename, &bytes) {
        Ok(url) => Some(url),
        Err(UploadError::NoFile) => None,
        Err(e) => {
            messages.push(flash::error(e.to_string()));
            None
        }
    }
}
