use super::*;

fn unsupported(request: &ApiRequest) -> String {
    format!(
        "{} {} requires a browser fetch implementation (wasm32 only)",
        request.method.as_str(),
        request.url
    )
}

pub async fn fetch_json<T: DeserializeOwned>(request: &ApiRequest) -> Result<T, String> {
    Err(unsupported(request))
}

pub async fn fetch_status(request: &ApiRequest) -> Result<u16, String> {
    Err(unsupported(request))
}

pub async fn sleep_ms(_ms: u32) {}
