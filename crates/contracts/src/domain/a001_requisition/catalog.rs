use serde::{Deserialize, Serialize};

/// Priority of a requisition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "Emergencia")]
    Emergency,
    #[serde(rename = "Urgencia")]
    Urgent,
    #[serde(rename = "Estándar")]
    Standard,
}

impl Priority {
    pub fn code(&self) -> &'static str {
        match self {
            Priority::Emergency => "Emergencia",
            Priority::Urgent => "Urgencia",
            Priority::Standard => "Estándar",
        }
    }

    pub fn all() -> Vec<Priority> {
        vec![Priority::Emergency, Priority::Urgent, Priority::Standard]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|p| p.code() == code)
    }
}

/// Product or service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    #[serde(rename = "Producto")]
    Product,
    #[serde(rename = "Servicio")]
    Service,
}

impl ItemType {
    pub fn code(&self) -> &'static str {
        match self {
            ItemType::Product => "Producto",
            ItemType::Service => "Servicio",
        }
    }

    pub fn all() -> Vec<ItemType> {
        vec![ItemType::Product, ItemType::Service]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|t| t.code() == code)
    }
}

/// Unit of measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "unidad")]
    Piece,
    #[serde(rename = "litro")]
    Liter,
    #[serde(rename = "metro")]
    Meter,
    #[serde(rename = "kilo")]
    Kilogram,
    #[serde(rename = "par")]
    Pair,
    #[serde(rename = "juego")]
    Set,
}

impl Unit {
    pub fn code(&self) -> &'static str {
        match self {
            Unit::Piece => "unidad",
            Unit::Liter => "litro",
            Unit::Meter => "metro",
            Unit::Kilogram => "kilo",
            Unit::Pair => "par",
            Unit::Set => "juego",
        }
    }

    pub fn all() -> Vec<Unit> {
        vec![
            Unit::Piece,
            Unit::Liter,
            Unit::Meter,
            Unit::Kilogram,
            Unit::Pair,
            Unit::Set,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|u| u.code() == code)
    }
}

/// Currency of the quoted price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "Dolares")]
    Usd,
    #[serde(rename = "Soles")]
    Pen,
    #[serde(rename = "Euros")]
    Eur,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "Dolares",
            Currency::Pen => "Soles",
            Currency::Eur => "Euros",
        }
    }

    /// ISO 4217 code
    pub fn iso(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Pen => "PEN",
            Currency::Eur => "EUR",
        }
    }

    pub fn all() -> Vec<Currency> {
        vec![Currency::Usd, Currency::Pen, Currency::Eur]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|c| c.code() == code || c.iso() == code)
    }
}

/// Top level of the classification taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    #[serde(rename = "Repuestos")]
    SpareParts,
    #[serde(rename = "Consumibles")]
    Consumables,
    #[serde(rename = "Herramientas")]
    Tools,
    #[serde(rename = "EPP")]
    SafetyEquipment,
    #[serde(rename = "Servicios")]
    Services,
    #[serde(rename = "Oficina")]
    Office,
}

impl Family {
    pub fn code(&self) -> &'static str {
        match self {
            Family::SpareParts => "Repuestos",
            Family::Consumables => "Consumibles",
            Family::Tools => "Herramientas",
            Family::SafetyEquipment => "EPP",
            Family::Services => "Servicios",
            Family::Office => "Oficina",
        }
    }

    pub fn all() -> Vec<Family> {
        vec![
            Family::SpareParts,
            Family::Consumables,
            Family::Tools,
            Family::SafetyEquipment,
            Family::Services,
            Family::Office,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|f| f.code() == code)
    }

    /// Subfamilies that belong to this family
    pub fn subfamilies(&self) -> Vec<Subfamily> {
        Subfamily::all()
            .into_iter()
            .filter(|s| s.family() == *self)
            .collect()
    }
}

/// Second level of the classification taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subfamily {
    #[serde(rename = "Mecánicos")]
    Mechanical,
    #[serde(rename = "Eléctricos")]
    Electrical,
    #[serde(rename = "Hidráulicos")]
    Hydraulic,
    #[serde(rename = "Neumáticos")]
    Pneumatic,
    #[serde(rename = "Soldadura")]
    Welding,
    #[serde(rename = "Abrasivos")]
    Abrasives,
    #[serde(rename = "Lubricantes")]
    Lubricants,
    #[serde(rename = "Limpieza")]
    Cleaning,
    #[serde(rename = "Manuales")]
    HandTools,
    #[serde(rename = "Eléctricas")]
    PowerTools,
    #[serde(rename = "Medición")]
    Measuring,
    #[serde(rename = "Cabeza")]
    HeadProtection,
    #[serde(rename = "Manos")]
    HandProtection,
    #[serde(rename = "Calzado")]
    Footwear,
    #[serde(rename = "Respiratoria")]
    Respiratory,
    #[serde(rename = "Mantenimiento")]
    Maintenance,
    #[serde(rename = "Calibración")]
    Calibration,
    #[serde(rename = "Transporte")]
    Transport,
    #[serde(rename = "Consultoría")]
    Consulting,
    #[serde(rename = "Papelería")]
    Stationery,
    #[serde(rename = "Cómputo")]
    Computing,
    #[serde(rename = "Mobiliario")]
    Furniture,
}

impl Subfamily {
    pub fn code(&self) -> &'static str {
        match self {
            Subfamily::Mechanical => "Mecánicos",
            Subfamily::Electrical => "Eléctricos",
            Subfamily::Hydraulic => "Hidráulicos",
            Subfamily::Pneumatic => "Neumáticos",
            Subfamily::Welding => "Soldadura",
            Subfamily::Abrasives => "Abrasivos",
            Subfamily::Lubricants => "Lubricantes",
            Subfamily::Cleaning => "Limpieza",
            Subfamily::HandTools => "Manuales",
            Subfamily::PowerTools => "Eléctricas",
            Subfamily::Measuring => "Medición",
            Subfamily::HeadProtection => "Cabeza",
            Subfamily::HandProtection => "Manos",
            Subfamily::Footwear => "Calzado",
            Subfamily::Respiratory => "Respiratoria",
            Subfamily::Maintenance => "Mantenimiento",
            Subfamily::Calibration => "Calibración",
            Subfamily::Transport => "Transporte",
            Subfamily::Consulting => "Consultoría",
            Subfamily::Stationery => "Papelería",
            Subfamily::Computing => "Cómputo",
            Subfamily::Furniture => "Mobiliario",
        }
    }

    pub fn family(&self) -> Family {
        match self {
            Subfamily::Mechanical
            | Subfamily::Electrical
            | Subfamily::Hydraulic
            | Subfamily::Pneumatic => Family::SpareParts,
            Subfamily::Welding
            | Subfamily::Abrasives
            | Subfamily::Lubricants
            | Subfamily::Cleaning => Family::Consumables,
            Subfamily::HandTools | Subfamily::PowerTools | Subfamily::Measuring => Family::Tools,
            Subfamily::HeadProtection
            | Subfamily::HandProtection
            | Subfamily::Footwear
            | Subfamily::Respiratory => Family::SafetyEquipment,
            Subfamily::Maintenance
            | Subfamily::Calibration
            | Subfamily::Transport
            | Subfamily::Consulting => Family::Services,
            Subfamily::Stationery | Subfamily::Computing | Subfamily::Furniture => Family::Office,
        }
    }

    pub fn all() -> Vec<Subfamily> {
        vec![
            Subfamily::Mechanical,
            Subfamily::Electrical,
            Subfamily::Hydraulic,
            Subfamily::Pneumatic,
            Subfamily::Welding,
            Subfamily::Abrasives,
            Subfamily::Lubricants,
            Subfamily::Cleaning,
            Subfamily::HandTools,
            Subfamily::PowerTools,
            Subfamily::Measuring,
            Subfamily::HeadProtection,
            Subfamily::HandProtection,
            Subfamily::Footwear,
            Subfamily::Respiratory,
            Subfamily::Maintenance,
            Subfamily::Calibration,
            Subfamily::Transport,
            Subfamily::Consulting,
            Subfamily::Stationery,
            Subfamily::Computing,
            Subfamily::Furniture,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|s| s.code() == code)
    }

    /// Lookup restricted to one family; a code from another family yields `None`
    pub fn from_code_in(family: Family, code: &str) -> Option<Self> {
        Self::from_code(code).filter(|s| s.family() == family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_family_has_subfamilies() {
        for family in Family::all() {
            assert!(!family.subfamilies().is_empty(), "{:?}", family);
        }
    }

    #[test]
    fn test_subfamily_codes_are_unique() {
        let mut codes: Vec<&str> = Subfamily::all().iter().map(|s| s.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), Subfamily::all().len());
    }

    #[test]
    fn test_from_code_in_rejects_foreign_subfamily() {
        assert_eq!(
            Subfamily::from_code_in(Family::Tools, "Medición"),
            Some(Subfamily::Measuring)
        );
        assert_eq!(Subfamily::from_code_in(Family::Office, "Medición"), None);
    }

    #[test]
    fn test_wire_names_match_codes() {
        assert_eq!(
            serde_json::to_string(&Priority::Standard).unwrap(),
            "\"Estándar\""
        );
        assert_eq!(serde_json::to_string(&Currency::Pen).unwrap(), "\"Soles\"");
        assert_eq!(serde_json::to_string(&Unit::Kilogram).unwrap(), "\"kilo\"");
        assert_eq!(Currency::from_code("EUR"), Some(Currency::Eur));
        assert_eq!(Priority::from_code("Baja"), None);
    }
}
