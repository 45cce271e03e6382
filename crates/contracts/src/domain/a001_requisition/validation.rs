use super::draft::{DraftField, RequisitionBatch, RequisitionDraft};

/// Required fields of `draft` that are still blank or inconsistent, in form order
pub fn missing_fields(draft: &RequisitionDraft) -> Vec<DraftField> {
    let fields = &draft.fields;
    DraftField::required()
        .into_iter()
        .filter(|field| match field {
            // a subfamily only counts when it belongs to the selected family
            DraftField::Subfamily => !matches!(
                (fields.family, fields.subfamily),
                (Some(family), Some(subfamily)) if subfamily.family() == family
            ),
            other => fields.value(*other).trim().is_empty(),
        })
        .collect()
}

pub fn is_complete(draft: &RequisitionDraft) -> bool {
    missing_fields(draft).is_empty()
}

/// Lowest index of a draft that cannot be submitted yet
pub fn first_incomplete_index(batch: &RequisitionBatch) -> Option<usize> {
    batch.drafts().iter().position(|d| !is_complete(d))
}

/// User-facing explanation for an incomplete draft at `index`
pub fn incomplete_message(index: usize, draft: &RequisitionDraft) -> String {
    let labels: Vec<&str> = missing_fields(draft).iter().map(|f| f.label()).collect();
    format!(
        "El formulario #{} está incompleto. Complete: {}",
        index + 1,
        labels.join(", ")
    )
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::super::draft::{DraftField, RequisitionBatch};

    /// Fill every required field of draft `index` with valid values
    pub fn fill(batch: &mut RequisitionBatch, index: usize) {
        let values = [
            (DraftField::Priority, "Urgencia"),
            (DraftField::CostCenter, "Mantenimiento"),
            (DraftField::ItemType, "Producto"),
            (DraftField::Description, "Rodamiento 6204"),
            (DraftField::Quantity, "4"),
            (DraftField::Price, "12.50"),
            (DraftField::Unit, "unidad"),
            (DraftField::Currency, "Soles"),
            (DraftField::Reason, "Cambio preventivo"),
            (DraftField::Family, "Repuestos"),
            (DraftField::Subfamily, "Mecánicos"),
        ];
        for (field, value) in values {
            batch.set_field(index, field, value);
        }
    }

    pub fn complete_batch(size: usize) -> RequisitionBatch {
        let mut batch = RequisitionBatch::new(None);
        for _ in 1..size {
            batch.add_draft();
        }
        for index in 0..size {
            fill(&mut batch, index);
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{complete_batch, fill};
    use super::*;
    use crate::domain::a001_requisition::catalog::{Family, Subfamily};

    #[test]
    fn test_blank_draft_is_incomplete() {
        let batch = RequisitionBatch::new(None);
        assert!(!is_complete(batch.active_draft()));
        assert_eq!(missing_fields(batch.active_draft()).len(), 11);
    }

    #[test]
    fn test_filled_draft_is_complete_without_machine() {
        let mut batch = RequisitionBatch::new(None);
        fill(&mut batch, 0);
        assert!(batch.active_draft().fields.machine.is_empty());
        assert!(is_complete(batch.active_draft()));
    }

    #[test]
    fn test_whitespace_only_field_is_incomplete() {
        for field in [
            DraftField::CostCenter,
            DraftField::Description,
            DraftField::Quantity,
            DraftField::Price,
            DraftField::Reason,
        ] {
            let mut batch = RequisitionBatch::new(None);
            fill(&mut batch, 0);
            batch.set_field(0, field, "   ");
            assert_eq!(missing_fields(batch.active_draft()), vec![field]);
        }
    }

    #[test]
    fn test_surrounding_whitespace_is_accepted() {
        let mut batch = RequisitionBatch::new(None);
        fill(&mut batch, 0);
        batch.set_field(0, DraftField::Description, "  cable  ");
        assert!(is_complete(batch.active_draft()));
    }

    #[test]
    fn test_mismatched_subfamily_is_incomplete() {
        let mut batch = RequisitionBatch::new(None);
        fill(&mut batch, 0);
        let mut draft = batch.active_draft().clone();
        draft.fields.family = Some(Family::Office);
        draft.fields.subfamily = Some(Subfamily::Mechanical);
        assert_eq!(missing_fields(&draft), vec![DraftField::Subfamily]);
    }

    #[test]
    fn test_first_incomplete_index() {
        let mut batch = complete_batch(3);
        assert_eq!(first_incomplete_index(&batch), None);

        batch.set_field(1, DraftField::Reason, "");
        batch.set_field(2, DraftField::Price, "");
        assert_eq!(first_incomplete_index(&batch), Some(1));
    }

    #[test]
    fn test_incomplete_message_lists_labels() {
        let mut batch = RequisitionBatch::new(None);
        fill(&mut batch, 0);
        batch.set_field(0, DraftField::Family, "EPP");
        let message = incomplete_message(0, batch.active_draft());
        assert_eq!(
            message,
            "El formulario #1 está incompleto. Complete: Subfamilia"
        );
    }
}
