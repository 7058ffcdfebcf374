//! `fetch` transport for [`HttpRequest`]

use documind_client::{ApiError, HttpMethod, HttpRequest, HttpResponse, RequestBody};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, File, FormData, Headers, Request, RequestInit, RequestMode, Response};

use crate::util::{js_error, window};

fn transport_error(err: JsValue) -> ApiError {
    ApiError::Unreachable(js_error(&err))
}

/// Send `request`, resolving multipart parts against `files` by name
///
/// Any HTTP status is a response; only transport failures (network, CORS,
/// timeout) become [`ApiError::Unreachable`].
pub async fn send(request: &HttpRequest, files: &[File]) -> Result<HttpResponse, ApiError> {
    let window = window().map_err(transport_error)?;

    let headers = Headers::new().map_err(transport_error)?;
    for (key, value) in &request.headers {
        headers.set(key, value).map_err(transport_error)?;
    }

    let opts = RequestInit::new();
    opts.set_method(match request.method {
        HttpMethod::Get => "GET",
        HttpMethod::Post => "POST",
    });
    opts.set_mode(RequestMode::Cors);

    match &request.body {
        RequestBody::Empty => {}
        RequestBody::Json(json) => {
            headers
                .set("Content-Type", "application/json")
                .map_err(transport_error)?;
            opts.set_body(&JsValue::from_str(json));
        }
        RequestBody::Multipart(parts) => {
            let form = FormData::new().map_err(transport_error)?;
            for part in parts {
                let file = files
                    .iter()
                    .find(|f| f.name() == part.original_name)
                    .ok_or_else(|| ApiError::Rejected(format!("missing file {}", part.original_name)))?;
                form.append_with_blob_and_filename(&part.field, file, &part.upload_name)
                    .map_err(transport_error)?;
            }
            opts.set_body(&JsValue::from(form));
        }
    }
    opts.set_headers(&headers.into());

    let controller = AbortController::new().map_err(transport_error)?;
    opts.set_signal(Some(&controller.signal()));
    let abort = Closure::once(move || controller.abort());
    let timer = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            abort.as_ref().unchecked_ref(),
            request.timeout_ms.min(i32::MAX as u32) as i32,
        )
        .map_err(transport_error)?;

    let fetched = match Request::new_with_str_and_init(&request.url, &opts) {
        Ok(req) => JsFuture::from(window.fetch_with_request(&req)).await,
        Err(e) => Err(e),
    };
    window.clear_timeout_with_handle(timer);
    drop(abort);

    let response: Response = fetched
        .map_err(transport_error)?
        .dyn_into()
        .map_err(|_| ApiError::Decode("not a Response".to_string()))?;
    let status = response.status();
    let buffer = JsFuture::from(response.array_buffer().map_err(transport_error)?)
        .await
        .map_err(transport_error)?;
    let body = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(HttpResponse::new(status, body))
}
