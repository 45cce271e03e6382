use super::catalog::{Currency, Family, ItemType, Priority, Subfamily, Unit};

/// Upper bound on drafts edited together in one batch
pub const MAX_DRAFTS: usize = 10;

/// Editable field of a requisition draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Priority,
    CostCenter,
    ItemType,
    Description,
    Machine,
    Quantity,
    Price,
    Unit,
    Currency,
    Reason,
    Family,
    Subfamily,
}

impl DraftField {
    pub fn all() -> Vec<DraftField> {
        vec![
            DraftField::Priority,
            DraftField::CostCenter,
            DraftField::ItemType,
            DraftField::Description,
            DraftField::Machine,
            DraftField::Quantity,
            DraftField::Price,
            DraftField::Unit,
            DraftField::Currency,
            DraftField::Reason,
            DraftField::Family,
            DraftField::Subfamily,
        ]
    }

    /// Fields that must be filled before the draft can be submitted
    pub fn required() -> Vec<DraftField> {
        Self::all()
            .into_iter()
            .filter(|f| *f != DraftField::Machine)
            .collect()
    }

    /// Form label shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            DraftField::Priority => "Prioridad",
            DraftField::CostCenter => "Centro de costo",
            DraftField::ItemType => "Tipo",
            DraftField::Description => "Descripción",
            DraftField::Machine => "Máquina",
            DraftField::Quantity => "Cantidad",
            DraftField::Price => "Precio",
            DraftField::Unit => "Unidad",
            DraftField::Currency => "Moneda",
            DraftField::Reason => "Motivo",
            DraftField::Family => "Familia",
            DraftField::Subfamily => "Subfamilia",
        }
    }

    /// Choices of a select-backed field; `None` for free-text fields.
    ///
    /// Subfamily choices depend on the family already picked in `fields`.
    pub fn options(&self, fields: &DraftFields) -> Option<Vec<&'static str>> {
        fn codes<T>(items: Vec<T>, code: fn(&T) -> &'static str) -> Option<Vec<&'static str>> {
            Some(items.iter().map(code).collect())
        }
        match self {
            DraftField::Priority => codes(Priority::all(), Priority::code),
            DraftField::ItemType => codes(ItemType::all(), ItemType::code),
            DraftField::Unit => codes(Unit::all(), Unit::code),
            DraftField::Currency => codes(Currency::all(), Currency::code),
            DraftField::Family => codes(Family::all(), Family::code),
            DraftField::Subfamily => codes(
                fields.family.map(|f| f.subfamilies()).unwrap_or_default(),
                Subfamily::code,
            ),
            _ => None,
        }
    }
}

/// Field values of one draft. Enumerated fields are `None` until chosen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftFields {
    pub priority: Option<Priority>,
    pub cost_center: String,
    pub item_type: Option<ItemType>,
    pub description: String,
    pub machine: String,
    pub quantity: String,
    pub price: String,
    pub unit: Option<Unit>,
    pub currency: Option<Currency>,
    pub reason: String,
    pub family: Option<Family>,
    pub subfamily: Option<Subfamily>,
}

impl DraftFields {
    /// Current value rendered as the string a form control binds to
    pub fn value(&self, field: DraftField) -> String {
        match field {
            DraftField::Priority => code_or_empty(self.priority.map(|v| v.code())),
            DraftField::CostCenter => self.cost_center.clone(),
            DraftField::ItemType => code_or_empty(self.item_type.map(|v| v.code())),
            DraftField::Description => self.description.clone(),
            DraftField::Machine => self.machine.clone(),
            DraftField::Quantity => self.quantity.clone(),
            DraftField::Price => self.price.clone(),
            DraftField::Unit => code_or_empty(self.unit.map(|v| v.code())),
            DraftField::Currency => code_or_empty(self.currency.map(|v| v.code())),
            DraftField::Reason => self.reason.clone(),
            DraftField::Family => code_or_empty(self.family.map(|v| v.code())),
            DraftField::Subfamily => code_or_empty(self.subfamily.map(|v| v.code())),
        }
    }

    /// Replace one field from its form-control string.
    ///
    /// Unknown codes for enumerated fields leave the field blank. Changing the
    /// family always clears the subfamily.
    pub fn set(&mut self, field: DraftField, value: &str) {
        match field {
            DraftField::Priority => self.priority = Priority::from_code(value),
            DraftField::CostCenter => self.cost_center = value.to_string(),
            DraftField::ItemType => self.item_type = ItemType::from_code(value),
            DraftField::Description => self.description = value.to_string(),
            DraftField::Machine => self.machine = value.to_string(),
            DraftField::Quantity => self.quantity = value.to_string(),
            DraftField::Price => self.price = value.to_string(),
            DraftField::Unit => self.unit = Unit::from_code(value),
            DraftField::Currency => self.currency = Currency::from_code(value),
            DraftField::Reason => self.reason = value.to_string(),
            DraftField::Family => {
                self.family = Family::from_code(value);
                self.subfamily = None;
            }
            DraftField::Subfamily => {
                self.subfamily = self
                    .family
                    .and_then(|family| Subfamily::from_code_in(family, value));
            }
        }
    }
}

fn code_or_empty(code: Option<&'static str>) -> String {
    code.unwrap_or_default().to_string()
}

/// One in-progress requisition form
#[derive(Debug, Clone, PartialEq)]
pub struct RequisitionDraft {
    /// Local identity, unique within the batch; not a server id
    pub id: u32,
    pub fields: DraftFields,
    /// Base64 image payload without the `data:` prefix
    pub attachment: Option<String>,
}

impl RequisitionDraft {
    fn blank(id: u32, fixed_cost_center: Option<&str>) -> Self {
        let mut fields = DraftFields::default();
        if let Some(cost_center) = fixed_cost_center {
            fields.cost_center = cost_center.to_string();
        }
        Self {
            id,
            fields,
            attachment: None,
        }
    }
}

/// Base64 part of a `data:` URL as produced by `FileReader.readAsDataURL`
pub fn data_url_payload(data_url: &str) -> Option<String> {
    let (header, payload) = data_url.split_once(',')?;
    if !header.starts_with("data:") || payload.is_empty() {
        return None;
    }
    Some(payload.to_string())
}

/// Ordered set of drafts edited together, with the active tab.
///
/// Always holds between 1 and [`MAX_DRAFTS`] drafts; operations that would
/// break this bound are silent no-ops, as are operations on a missing index.
#[derive(Debug, Clone, PartialEq)]
pub struct RequisitionBatch {
    drafts: Vec<RequisitionDraft>,
    active: usize,
    next_id: u32,
    fixed_cost_center: Option<String>,
}

impl RequisitionBatch {
    /// New batch with one blank draft. `fixed_cost_center` is pre-filled into
    /// every draft for roles that cannot choose their cost center.
    pub fn new(fixed_cost_center: Option<String>) -> Self {
        let first = RequisitionDraft::blank(0, fixed_cost_center.as_deref());
        Self {
            drafts: vec![first],
            active: 0,
            next_id: 1,
            fixed_cost_center,
        }
    }

    pub fn drafts(&self) -> &[RequisitionDraft] {
        &self.drafts
    }

    pub fn draft(&self, index: usize) -> Option<&RequisitionDraft> {
        self.drafts.get(index)
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn active_draft(&self) -> &RequisitionDraft {
        &self.drafts[self.active]
    }

    pub fn fixed_cost_center(&self) -> Option<&str> {
        self.fixed_cost_center.as_deref()
    }

    pub fn can_add(&self) -> bool {
        self.drafts.len() < MAX_DRAFTS
    }

    pub fn can_remove(&self) -> bool {
        self.drafts.len() > 1
    }

    pub fn add_draft(&mut self) {
        if !self.can_add() {
            return;
        }
        let draft = RequisitionDraft::blank(self.next_id, self.fixed_cost_center.as_deref());
        self.next_id += 1;
        self.drafts.push(draft);
        self.active = self.drafts.len() - 1;
    }

    pub fn remove_draft(&mut self, index: usize) {
        if !self.can_remove() || index >= self.drafts.len() {
            return;
        }
        self.drafts.remove(index);
        if index < self.active {
            self.active -= 1;
        } else {
            self.active = self.active.min(self.drafts.len() - 1);
        }
    }

    pub fn select_tab(&mut self, index: usize) {
        if index < self.drafts.len() {
            self.active = index;
        }
    }

    pub fn set_field(&mut self, index: usize, field: DraftField, value: &str) {
        if field == DraftField::CostCenter && self.fixed_cost_center.is_some() {
            return;
        }
        if let Some(draft) = self.drafts.get_mut(index) {
            draft.fields.set(field, value);
        }
    }

    pub fn set_attachment(&mut self, index: usize, attachment: Option<String>) {
        if let Some(draft) = self.drafts.get_mut(index) {
            draft.attachment = attachment;
        }
    }

    /// Replace the whole batch with a single blank draft on tab 0
    pub fn reset(&mut self) {
        let draft = RequisitionDraft::blank(self.next_id, self.fixed_cost_center.as_deref());
        self.next_id += 1;
        self.drafts = vec![draft];
        self.active = 0;
    }
}
