use contracts::domain::a001_requisition::export::UNASSIGNED_PURCHASE_ORDER;
use contracts::domain::a001_requisition::record::{Requisition, RequisitionStatus};
use leptos::prelude::*;
use thaw::*;

use crate::shared::number_format::{format_amount, format_quantity};

pub fn status_badge_class(status: RequisitionStatus) -> &'static str {
    match status {
        RequisitionStatus::Pending => "badge badge--warning",
        RequisitionStatus::Approved => "badge badge--success",
        RequisitionStatus::Rejected => "badge badge--error",
        RequisitionStatus::Unknown => "badge",
    }
}

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "—".to_string()
    } else {
        value.to_string()
    }
}

/// Read-only dialog with every field of one requisition
#[component]
pub fn RequisitionDetailDialog(
    open: RwSignal<bool>,
    #[prop(into)] record: Signal<Option<Requisition>>,
    /// Resolved requester name, when the caller knows it
    #[prop(optional, into)]
    requester: Option<Signal<String>>,
) -> impl IntoView {
    let rows = move || {
        let Some(r) = record.get() else {
            return Vec::new();
        };
        let mut rows = vec![
            ("Prioridad", or_dash(&r.priority)),
            ("Centro de costo", or_dash(r.cost_center.as_deref().unwrap_or_default())),
            ("Tipo", or_dash(&r.item_type)),
            ("Descripción", or_dash(&r.description)),
            ("Máquina", or_dash(r.machine.as_deref().unwrap_or_default())),
            ("Cantidad", format!("{} {}", format_quantity(&r.quantity), r.unit)),
            ("Precio", format!("{} {}", format_amount(&r.price), r.currency)),
            ("Motivo", or_dash(&r.reason)),
            ("Familia", or_dash(&r.family)),
            ("Subfamilia", or_dash(&r.subfamily)),
            ("Estado", or_dash(r.status.code())),
            (
                "Orden de compra",
                r.assigned_purchase_order()
                    .unwrap_or(UNASSIGNED_PURCHASE_ORDER)
                    .to_string(),
            ),
        ];
        if let Some(name) = requester {
            rows.push(("Solicitante", name.get()));
        }
        rows
    };

    view! {
        <Dialog open=open>
            <DialogSurface>
                <DialogBody>
                    <DialogTitle>
                        {move || record.get().map(|r| format!("Solicitud {}", r.code())).unwrap_or_default()}
                    </DialogTitle>
                    <DialogContent>
                        <dl class="detail-list">
                            {move || rows().into_iter().map(|(label, value)| view! {
                                <dt>{label}</dt>
                                <dd>{value}</dd>
                            }).collect_view()}
                        </dl>
                    </DialogContent>
                    <DialogActions>
                        <Button appearance=ButtonAppearance::Primary on_click=move |_| open.set(false)>
                            "Cerrar"
                        </Button>
                    </DialogActions>
                </DialogBody>
            </DialogSurface>
        </Dialog>
    }
}
