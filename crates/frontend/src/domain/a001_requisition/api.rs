use async_trait::async_trait;
use contracts::domain::a001_requisition::record::{ListScope, Requisition, RequisitionPatch};
use contracts::domain::a001_requisition::submission::{Delay, RequisitionGateway, RequisitionPayload};
use contracts::shared::http::HttpReply;
use contracts::shared::page::{Page, PageQuery};
use gloo_net::http::{Request, Response};

use crate::shared::api_utils::{api_url, bearer};

/// Requisition endpoints over `gloo-net`
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpRequisitionApi;

/// Stagger timer on the browser event loop
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserDelay;

async fn into_reply(response: Response) -> HttpReply {
    let status = response.status();
    match response.text().await {
        Ok(body) => HttpReply::new(status, body),
        Err(e) => {
            log::warn!("response body of HTTP {} unreadable: {}", status, e);
            HttpReply::unreadable(status)
        }
    }
}

#[async_trait(?Send)]
impl RequisitionGateway for HttpRequisitionApi {
    async fn create(
        &self,
        token: &str,
        payload: &RequisitionPayload,
    ) -> Result<HttpReply, String> {
        let response = Request::post(&api_url("/solicitudes"))
            .header("Authorization", &bearer(token))
            .json(payload)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        Ok(into_reply(response).await)
    }

    async fn update(
        &self,
        token: &str,
        id: i64,
        patch: &RequisitionPatch,
    ) -> Result<HttpReply, String> {
        let response = Request::patch(&api_url(&format!("/solicitudes/{}", id)))
            .header("Authorization", &bearer(token))
            .json(patch)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        Ok(into_reply(response).await)
    }
}

#[async_trait(?Send)]
impl Delay for BrowserDelay {
    async fn sleep_ms(&self, ms: u32) {
        gloo_timers::future::TimeoutFuture::new(ms).await;
    }
}

/// Fetch one page of requisitions from `scope`
pub async fn fetch_page(
    token: &str,
    scope: ListScope,
    query: PageQuery,
) -> Result<Page<Requisition>, String> {
    let qs = serde_qs::to_string(&query).map_err(|e| format!("Failed to build query: {}", e))?;
    let url = format!("{}?{}", api_url(&scope.path()), qs);

    let response = Request::get(&url)
        .header("Authorization", &bearer(token))
        .send()
        .await
        .map_err(|e| format!("Error de conexión: {}", e))?;

    if !response.ok() {
        return Err(format!(
            "No se pudieron cargar las solicitudes (HTTP {})",
            response.status()
        ));
    }

    response
        .json::<Page<Requisition>>()
        .await
        .map_err(|e| format!("Respuesta inválida: {}", e))
}

/// Attachment bytes and their content type
pub async fn fetch_attachment(token: &str, id: i64) -> Result<(Vec<u8>, String), String> {
    let response = Request::get(&api_url(&format!("/solicitudes/imagen/{}", id)))
        .header("Authorization", &bearer(token))
        .send()
        .await
        .map_err(|e| format!("Error de conexión: {}", e))?;

    if !response.ok() {
        return Err(format!(
            "No se pudo descargar la imagen (HTTP {})",
            response.status()
        ));
    }

    let mime = response
        .headers()
        .get("content-type")
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let bytes = response
        .binary()
        .await
        .map_err(|e| format!("Failed to read image: {}", e))?;
    Ok((bytes, mime))
}

/// Cost centers offered in the form
pub async fn fetch_areas(token: &str) -> Result<Vec<String>, String> {
    let response = Request::get(&api_url("/areas/all"))
        .header("Authorization", &bearer(token))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(format!("Failed to fetch areas: {}", response.status()));
    }

    response
        .json::<Vec<String>>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}
