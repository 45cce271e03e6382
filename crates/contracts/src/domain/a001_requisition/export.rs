use super::record::Requisition;
use crate::shared::export::CsvExportable;
use crate::system::users::UNKNOWN_USER;

pub const UNASSIGNED_PURCHASE_ORDER: &str = "Sin asignar";

/// One exported review row: the record plus its resolved requester name
#[derive(Debug, Clone)]
pub struct RequisitionExportRow<'a> {
    pub record: &'a Requisition,
    pub requester: Option<&'a str>,
}

impl CsvExportable for RequisitionExportRow<'_> {
    fn headers() -> Vec<&'static str> {
        vec![
            "ID",
            "Prioridad",
            "Tipo",
            "Descripción",
            "Motivo",
            "Familia",
            "Subfamilia",
            "Cantidad",
            "Precio",
            "Unidad",
            "Moneda",
            "Estado",
            "Orden de Compra",
            "Usuario",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        let r = self.record;
        vec![
            r.code(),
            r.priority.clone(),
            r.item_type.clone(),
            r.description.clone(),
            r.reason.clone(),
            r.family.clone(),
            r.subfamily.clone(),
            r.quantity.clone(),
            r.price.clone(),
            r.unit.clone(),
            r.currency.clone(),
            r.status.code().to_string(),
            r.assigned_purchase_order()
                .unwrap_or(UNASSIGNED_PURCHASE_ORDER)
                .to_string(),
            self.requester.unwrap_or(UNKNOWN_USER).to_string(),
        ]
    }
}

/// File name for an export taken at `stamp`
pub fn export_file_name(stamp: &str) -> String {
    format!("solicitudes_{}.csv", stamp)
}

/// File name for the attachment of requisition `id`
pub fn attachment_file_name(id: i64) -> String {
    format!("solicitud_{}_imagen", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_requisition::record::RequisitionStatus;
    use crate::shared::export::build_csv;

    #[test]
    fn test_row_placeholders() {
        let record = Requisition {
            id: 7,
            description: "Cable; 2x14".to_string(),
            status: RequisitionStatus::Pending,
            ..Requisition::default()
        };
        let row = RequisitionExportRow {
            record: &record,
            requester: None,
        };
        let cells = row.to_csv_row();
        assert_eq!(cells.len(), RequisitionExportRow::headers().len());
        assert_eq!(cells[0], "RQ7");
        assert_eq!(cells[12], "Sin asignar");
        assert_eq!(cells[13], "Desconocido");

        let csv = build_csv(&[row]).unwrap();
        assert!(csv.contains("\"Cable; 2x14\""));
    }

    #[test]
    fn test_file_names() {
        assert_eq!(attachment_file_name(42), "solicitud_42_imagen");
        assert_eq!(
            export_file_name("20240105_0930"),
            "solicitudes_20240105_0930.csv"
        );
    }
}
