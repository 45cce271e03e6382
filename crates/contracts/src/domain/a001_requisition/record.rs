use serde::{Deserialize, Deserializer, Serialize};

use super::catalog::{Family, Subfamily};

/// Review status of a persisted requisition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RequisitionStatus {
    #[default]
    #[serde(rename = "Pendiente")]
    Pending,
    #[serde(rename = "Aprobado")]
    Approved,
    #[serde(rename = "Rechazado")]
    Rejected,
    /// Any status string this client does not know
    #[serde(other)]
    Unknown,
}

impl RequisitionStatus {
    pub fn code(&self) -> &'static str {
        match self {
            RequisitionStatus::Pending => "Pendiente",
            RequisitionStatus::Approved => "Aprobado",
            RequisitionStatus::Rejected => "Rechazado",
            RequisitionStatus::Unknown => "",
        }
    }

    /// Statuses a reviewer can choose
    pub fn all() -> Vec<RequisitionStatus> {
        vec![
            RequisitionStatus::Pending,
            RequisitionStatus::Approved,
            RequisitionStatus::Rejected,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|s| s.code() == code)
    }
}

/// Requisition as stored by the backend.
///
/// Descriptive fields stay as strings: the server may hold values that
/// predate the current catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Requisition {
    pub id: i64,
    #[serde(rename = "prioridad", default, deserialize_with = "lenient_string")]
    pub priority: String,
    #[serde(rename = "sp", default, deserialize_with = "lenient_string")]
    pub item_type: String,
    #[serde(rename = "descripcion", default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(rename = "cantidad", default, deserialize_with = "lenient_string")]
    pub quantity: String,
    #[serde(rename = "precio", default, deserialize_with = "lenient_string")]
    pub price: String,
    #[serde(rename = "umedida", default, deserialize_with = "lenient_string")]
    pub unit: String,
    #[serde(rename = "moneda", default, deserialize_with = "lenient_string")]
    pub currency: String,
    #[serde(rename = "estado", default, deserialize_with = "lenient_status")]
    pub status: RequisitionStatus,
    #[serde(rename = "usuarioId", default, deserialize_with = "lenient_id")]
    pub user_id: i64,
    #[serde(rename = "ordenCompra", default, deserialize_with = "lenient_optional_string")]
    pub purchase_order: Option<String>,
    #[serde(rename = "motivo", default, deserialize_with = "lenient_string")]
    pub reason: String,
    #[serde(rename = "familia", default, deserialize_with = "lenient_string")]
    pub family: String,
    #[serde(rename = "subFamilia", default, deserialize_with = "lenient_string")]
    pub subfamily: String,
    #[serde(rename = "area", default, deserialize_with = "lenient_optional_string")]
    pub cost_center: Option<String>,
    #[serde(rename = "maquina", default, deserialize_with = "lenient_optional_string")]
    pub machine: Option<String>,
}

/// Accept strings, numbers and null for text columns
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

fn lenient_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Null keeps the default; a value that is not a known code becomes `Unknown`
fn lenient_status<'de, D>(deserializer: D) -> Result<RequisitionStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => RequisitionStatus::default(),
        Some(serde_json::Value::String(s)) => {
            RequisitionStatus::from_code(&s).unwrap_or(RequisitionStatus::Unknown)
        }
        Some(_) => RequisitionStatus::Unknown,
    })
}

/// Ids arrive as numbers, numeric strings or null; anything unreadable is 0
fn lenient_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64().unwrap_or_default(),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}

impl Requisition {
    /// Display code, e.g. `RQ15`
    pub fn code(&self) -> String {
        format!("RQ{}", self.id)
    }

    /// Purchase order, if one has been assigned
    pub fn assigned_purchase_order(&self) -> Option<&str> {
        self.purchase_order
            .as_deref()
            .map(str::trim)
            .filter(|po| !po.is_empty())
    }

    pub fn family_kind(&self) -> Option<Family> {
        Family::from_code(&self.family)
    }

    pub fn subfamily_kind(&self) -> Option<Subfamily> {
        self.family_kind()
            .and_then(|family| Subfamily::from_code_in(family, &self.subfamily))
    }
}

/// Which listing endpoint a table reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    /// Every requisition, for purchasing
    All,
    /// Requisitions visible to the logged-in area manager
    Manager,
    /// Requisitions raised by one user
    Requester(i64),
}

impl ListScope {
    pub fn path(&self) -> String {
        match self {
            ListScope::All => "/solicitudes".to_string(),
            ListScope::Manager => "/solicitudes/jefe".to_string(),
            ListScope::Requester(user_id) => format!("/solicitudes/usuario/{}", user_id),
        }
    }
}

/// Body of `PATCH /solicitudes/{id}`; only the set fields are sent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RequisitionPatch {
    #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
    pub status: Option<RequisitionStatus>,
    #[serde(rename = "ordenCompra", skip_serializing_if = "Option::is_none")]
    pub purchase_order: Option<String>,
    #[serde(rename = "familia", skip_serializing_if = "Option::is_none")]
    pub family: Option<Family>,
    #[serde(rename = "subFamilia", skip_serializing_if = "Option::is_none")]
    pub subfamily: Option<Subfamily>,
}

impl RequisitionPatch {
    pub fn status(status: RequisitionStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn purchase_order(purchase_order: impl Into<String>) -> Self {
        Self {
            purchase_order: Some(purchase_order.into()),
            ..Self::default()
        }
    }

    pub fn category(family: Family, subfamily: Subfamily) -> Self {
        Self {
            family: Some(family),
            subfamily: Some(subfamily),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::page::Page;

    #[test]
    fn test_deserialize_backend_record() {
        let json = r#"{
            "id": 15,
            "prioridad": "Urgencia",
            "sp": "Producto",
            "descripcion": "Guantes de nitrilo",
            "cantidad": 20,
            "precio": "3.5",
            "umedida": "par",
            "moneda": "Soles",
            "estado": "Aprobado",
            "usuarioId": 4,
            "ordenCompra": null,
            "motivo": "Stock",
            "familia": "EPP",
            "subFamilia": "Manos"
        }"#;
        let record: Requisition = serde_json::from_str(json).unwrap();
        assert_eq!(record.code(), "RQ15");
        assert_eq!(record.quantity, "20");
        assert_eq!(record.status, RequisitionStatus::Approved);
        assert_eq!(record.assigned_purchase_order(), None);
        assert_eq!(record.subfamily_kind(), Some(Subfamily::HandProtection));
    }

    #[test]
    fn test_unknown_status_does_not_break_parsing() {
        let record: Requisition =
            serde_json::from_str(r#"{"id": 1, "estado": "Archivado"}"#).unwrap();
        assert_eq!(record.status, RequisitionStatus::Unknown);
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_null_columns_keep_the_record() {
        let record: Requisition = serde_json::from_str(
            r#"{"id": 1, "estado": null, "usuarioId": null, "area": null, "ordenCompra": 4512}"#,
        )
        .unwrap();
        assert_eq!(record.status, RequisitionStatus::Pending);
        assert_eq!(record.user_id, 0);
        assert_eq!(record.cost_center, None);
        assert_eq!(record.assigned_purchase_order(), Some("4512"));

        let record: Requisition =
            serde_json::from_str(r#"{"id": 2, "estado": 3, "usuarioId": "7"}"#).unwrap();
        assert_eq!(record.status, RequisitionStatus::Unknown);
        assert_eq!(record.user_id, 7);
    }

    #[test]
    fn test_page_with_null_status_row_keeps_every_row() {
        let json = r#"{
            "content": [
                {"id": 1, "estado": "Aprobado", "usuarioId": 4},
                {"id": 2, "estado": null, "usuarioId": 5}
            ],
            "totalPages": 1,
            "totalElements": 2
        }"#;
        let page: Page<Requisition> = serde_json::from_str(json).unwrap();
        assert_eq!(page.content.len(), 2);
        assert_eq!(page.content[0].status, RequisitionStatus::Approved);
        assert_eq!(page.content[1].status, RequisitionStatus::Pending);
        assert_eq!(page.content[1].user_id, 5);
    }

    #[test]
    fn test_list_scope_paths() {
        assert_eq!(ListScope::All.path(), "/solicitudes");
        assert_eq!(ListScope::Manager.path(), "/solicitudes/jefe");
        assert_eq!(ListScope::Requester(8).path(), "/solicitudes/usuario/8");
    }

    #[test]
    fn test_patch_sends_only_set_fields() {
        let body = serde_json::to_value(RequisitionPatch::status(RequisitionStatus::Approved))
            .unwrap();
        assert_eq!(body, serde_json::json!({"estado": "Aprobado"}));

        let body = serde_json::to_value(RequisitionPatch::category(
            Family::Tools,
            Subfamily::HandTools,
        ))
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"familia": "Herramientas", "subFamilia": "Manuales"})
        );
    }
}
