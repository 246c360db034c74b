use super::*;
use js_sys::Promise;
use serde_wasm_bindgen::from_value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

fn js_error_to_string(err: JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    if let Ok(message) = js_sys::Reflect::get(&err, &JsValue::from_str("message")) {
        if let Some(text) = message.as_string() {
            return text;
        }
    }
    format!("{err:?}")
}

async fn send(request: &ApiRequest) -> Result<Response, String> {
    let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
    let headers = Headers::new().map_err(js_error_to_string)?;
    headers
        .set("Accept", "application/json")
        .map_err(js_error_to_string)?;
    if let Some(token) = &request.bearer {
        headers
            .set("Authorization", &format!("Bearer {token}"))
            .map_err(js_error_to_string)?;
    }

    let init = RequestInit::new();
    init.set_method(request.method.as_str());
    if let Some(body) = &request.body {
        headers
            .set("Content-Type", "application/json")
            .map_err(js_error_to_string)?;
        init.set_body(&JsValue::from_str(body));
    }
    init.set_headers(&headers);

    let req = Request::new_with_str_and_init(&request.url, &init).map_err(js_error_to_string)?;
    let value = JsFuture::from(window.fetch_with_request(&req))
        .await
        .map_err(js_error_to_string)?;
    value.dyn_into::<Response>().map_err(js_error_to_string)
}

pub async fn fetch_json<T: DeserializeOwned>(request: &ApiRequest) -> Result<T, String> {
    let response = send(request).await?;
    if !response.ok() {
        return Err(format!(
            "{} {} -> HTTP {}",
            request.method.as_str(),
            request.url,
            response.status()
        ));
    }
    let json = JsFuture::from(response.json().map_err(js_error_to_string)?)
        .await
        .map_err(js_error_to_string)?;
    from_value(json).map_err(|e| e.to_string())
}

pub async fn fetch_status(request: &ApiRequest) -> Result<u16, String> {
    Ok(send(request).await?.status())
}

pub async fn sleep_ms(ms: u32) {
    let promise = Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window().is_some_and(|window| {
            window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    &resolve,
                    ms.min(i32::MAX as u32) as i32,
                )
                .is_ok()
        });
        if !scheduled {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    let _ = JsFuture::from(promise).await;
}
