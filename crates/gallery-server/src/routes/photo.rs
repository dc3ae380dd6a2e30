use crate::{error::ApiError, state::AppState, viewer::CurrentViewer};
use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use gallery::{
    photo::{PhotoPresenter, PhotoResource},
    upload::{AddPhotoRequest, PhotoIngest, UploadForm, UploadedFile},
};

/// `POST /api/Photo::add`
pub async fn add_photo(
    State(state): State<AppState>,
    CurrentViewer(viewer): CurrentViewer,
    multipart: Multipart,
) -> Result<(StatusCode, Json<PhotoResource>), ApiError> {
    let form = read_form(multipart).await?;
    let request =
        AddPhotoRequest::from_form(form, &state.config.upload_policy(), &viewer, &state.catalog)?;

    let photo = state.catalog.add(&viewer, request)?;
    let resource = state.presenter.present(&photo)?;

    Ok((StatusCode::CREATED, Json(resource)))
}

/// Parts with a file name are files, everything else is a text field.
async fn read_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                tracing::debug!(%name, %file_name, size = bytes.len(), "received file part");
                form = form.file(
                    name,
                    UploadedFile {
                        file_name: Some(file_name),
                        content_type,
                        bytes,
                    },
                );
            }
            None => {
                let value = field.text().await?;
                form = form.field(name, value);
            }
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::super::{
        router,
        tests::{album_id, body_string, catalog},
    };
    use crate::{config::Config, state::AppState, viewer::USER_HEADER};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use gallery::{id::UserId, user::User};
    use tower::ServiceExt;

    const BOUNDARY: &str = "gallery-test-boundary";

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a str, &'a [u8]),
    }

    fn multipart(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                            .as_bytes(),
                    );
                }
                Part::File(name, file_name, content_type, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                    body.extend_from_slice(b"\r\n");
                }
            }
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload(user: Option<u64>, parts: &[Part<'_>]) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/Photo::add")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(user) = user {
            builder = builder.header(USER_HEADER, user.to_string());
        }
        builder.body(Body::from(multipart(parts))).expect("request")
    }

    fn state() -> AppState {
        let mut config = Config::default();
        config.users = vec![
            User {
                id: UserId::from(1),
                username: "owner".into(),
                may_upload: true,
            },
            User {
                id: UserId::from(2),
                username: "visitor".into(),
                may_upload: true,
            },
        ];
        AppState::new(config, catalog()).expect("state")
    }

    async fn json(response: axum::response::Response) -> serde_json::Value {
        serde_json::from_str(&body_string(response).await).expect("json")
    }

    #[tokio::test]
    async fn owner_uploads_into_album() {
        let album = album_id(1);
        let response = router(state())
            .oneshot(upload(
                Some(1),
                &[
                    Part::Text("albumID", &album),
                    Part::File("0", "beach.jpg", "image/jpeg", b"jpegdata"),
                ],
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json(response).await;
        assert_eq!(body["album"], album);
        assert_eq!(body["title"], "beach");
        assert_eq!(body["filesize"], 8);
    }

    #[tokio::test]
    async fn missing_file_is_a_validation_error() {
        let album = album_id(1);
        let response = router(state())
            .oneshot(upload(Some(1), &[Part::Text("albumID", &album)]))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json(response).await;
        assert_eq!(body["errors"]["0"][0], "The 0 field is required.");
        assert!(body["errors"].get("albumID").is_none());
    }

    #[tokio::test]
    async fn foreign_album_is_forbidden() {
        let album = album_id(1);
        let response = router(state())
            .oneshot(upload(
                Some(2),
                &[
                    Part::Text("albumID", &album),
                    Part::File("0", "beach.jpg", "image/jpeg", b"jpegdata"),
                ],
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(json(response).await.get("errors").is_none());
    }

    #[tokio::test]
    async fn guest_is_forbidden() {
        let response = router(state())
            .oneshot(upload(
                None,
                &[
                    Part::Text("albumID", ""),
                    Part::File("0", "beach.jpg", "image/jpeg", b"jpegdata"),
                ],
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn malformed_album_id_is_invalid() {
        let response = router(state())
            .oneshot(upload(
                Some(1),
                &[
                    Part::Text("albumID", "not-an-album"),
                    Part::File("0", "beach.jpg", "image/jpeg", b"jpegdata"),
                ],
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json(response).await;
        assert!(body["errors"]["albumID"].is_array());
    }

    #[tokio::test]
    async fn bad_user_header_is_rejected() {
        let mut request = upload(None, &[Part::Text("albumID", "")]);
        request
            .headers_mut()
            .insert(USER_HEADER, "admin".parse().expect("header"));
        let response = router(state()).oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
