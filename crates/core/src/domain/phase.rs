use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::CoreError;

/// The nine fixed lifecycle stages of a unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum PhaseName {
    Interacao,
    PreCompras,
    Compras,
    PreInauguracaoSemana1,
    PreInauguracaoSemana2,
    Inauguracao,
    Operacao,
    LojaFechadaTemporariamente,
    LojaFechadaDefinitivamente,
}

impl PhaseName {
    /// Phase assigned to every newly registered unit.
    pub const INITIAL: PhaseName = PhaseName::Interacao;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interacao => "interacao",
            Self::PreCompras => "pre_compras",
            Self::Compras => "compras",
            Self::PreInauguracaoSemana1 => "pre_inauguracao_semana_1",
            Self::PreInauguracaoSemana2 => "pre_inauguracao_semana_2",
            Self::Inauguracao => "inauguracao",
            Self::Operacao => "operacao",
            Self::LojaFechadaTemporariamente => "loja_fechada_temporariamente",
            Self::LojaFechadaDefinitivamente => "loja_fechada_definitivamente",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "interacao" => Some(Self::Interacao),
            "pre_compras" => Some(Self::PreCompras),
            "compras" => Some(Self::Compras),
            "pre_inauguracao_semana_1" => Some(Self::PreInauguracaoSemana1),
            "pre_inauguracao_semana_2" => Some(Self::PreInauguracaoSemana2),
            "inauguracao" => Some(Self::Inauguracao),
            "operacao" => Some(Self::Operacao),
            "loja_fechada_temporariamente" => Some(Self::LojaFechadaTemporariamente),
            "loja_fechada_definitivamente" => Some(Self::LojaFechadaDefinitivamente),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Interacao => "Interação",
            Self::PreCompras => "Pré-Compras",
            Self::Compras => "Compras",
            Self::PreInauguracaoSemana1 => "Pré-Inauguração - Semana 1",
            Self::PreInauguracaoSemana2 => "Pré-Inauguração - Semana 2",
            Self::Inauguracao => "Inauguração",
            Self::Operacao => "Operação",
            Self::LojaFechadaTemporariamente => "Loja Fechada Temporariamente",
            Self::LojaFechadaDefinitivamente => "Loja Fechada Definitivamente",
        }
    }

    pub fn all() -> [PhaseName; 9] {
        [
            Self::Interacao,
            Self::PreCompras,
            Self::Compras,
            Self::PreInauguracaoSemana1,
            Self::PreInauguracaoSemana2,
            Self::Inauguracao,
            Self::Operacao,
            Self::LojaFechadaTemporariamente,
            Self::LojaFechadaDefinitivamente,
        ]
    }
}

impl std::fmt::Display for PhaseName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Phase {
    pub id: Uuid,
    pub name: PhaseName,
    pub order: u32,
    pub min_duration_days: Option<u32>,
    pub max_duration_days: Option<u32>,
    pub description: String,
    pub notes: Option<String>,
    /// `None` only for the terminal phase.
    pub next_phase_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Phase {
    pub fn new(name: PhaseName, order: u32, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            order,
            min_duration_days: None,
            max_duration_days: None,
            description: description.into(),
            notes: None,
            next_phase_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_duration(mut self, duration: PhaseDuration) -> Self {
        self.min_duration_days = Some(duration.min_days);
        self.max_duration_days = Some(duration.max_days);
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.next_phase_id.is_none()
    }

    pub fn display_name(&self) -> &'static str {
        self.name.display_name()
    }

    pub fn duration(&self) -> Option<PhaseDuration> {
        match (self.min_duration_days, self.max_duration_days) {
            (Some(min_days), Some(max_days)) => Some(PhaseDuration { min_days, max_days }),
            _ => None,
        }
    }
}

/// Expected time a unit spends in a phase, in days.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct PhaseDuration {
    pub min_days: u32,
    pub max_days: u32,
}

impl PhaseDuration {
    pub fn new(min_days: u32, max_days: u32) -> Result<Self, CoreError> {
        if min_days > max_days {
            return Err(CoreError::Validation(format!(
                "minimum duration ({} days) exceeds maximum ({} days)",
                min_days, max_days
            )));
        }
        Ok(Self { min_days, max_days })
    }

    /// Parses the `"<min>-<max> dias"` text used by the phase editor.
    /// Only the first two integers separated by `-` are read.
    pub fn parse(text: &str) -> Option<Self> {
        let (min, rest) = text.trim().split_once('-')?;
        let min_days = min.trim().parse().ok()?;
        let max: String = rest
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        let max_days = max.parse().ok()?;
        Self::new(min_days, max_days).ok()
    }
}

impl std::fmt::Display for PhaseDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{} dias", self.min_days, self.max_days)
    }
}

/// Editable catalog fields. Name, order and successor are fixed.
#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct UpdatePhaseRequest {
    pub description: Option<String>,
    pub min_duration_days: Option<u32>,
    pub max_duration_days: Option<u32>,
    pub notes: Option<String>,
}

/// Ordered view over the phase records owned by the data store.
#[derive(Debug, Clone, Default)]
pub struct PhaseCatalog {
    phases: Vec<Phase>,
}

impl PhaseCatalog {
    pub fn new(mut phases: Vec<Phase>) -> Self {
        phases.sort_by_key(|p| p.order);
        Self { phases }
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn into_phases(self) -> Vec<Phase> {
        self.phases
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn find(&self, id: Uuid) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == id)
    }

    pub fn by_name(&self, name: PhaseName) -> Option<&Phase> {
        self.phases.iter().find(|p| p.name == name)
    }

    pub fn initial(&self) -> Option<&Phase> {
        self.by_name(PhaseName::INITIAL)
    }

    pub fn successor(&self, id: Uuid) -> Option<&Phase> {
        self.find(id)
            .and_then(|p| p.next_phase_id)
            .and_then(|next| self.find(next))
    }

    pub fn terminals(&self) -> impl Iterator<Item = &Phase> {
        self.phases.iter().filter(|p| p.is_terminal())
    }

    /// Checks the structural invariants of the lifecycle: exactly one terminal
    /// phase, unique order indices, resolvable successors and each fixed stage
    /// present once.
    pub fn validate(&self) -> Result<(), CoreError> {
        let terminals = self.terminals().count();
        if terminals != 1 {
            return Err(CoreError::InvalidCatalog(format!(
                "expected exactly one terminal phase, found {}",
                terminals
            )));
        }

        for pair in self.phases.windows(2) {
            if pair[0].order == pair[1].order {
                return Err(CoreError::InvalidCatalog(format!(
                    "phases {} and {} share order {}",
                    pair[0].name, pair[1].name, pair[0].order
                )));
            }
        }

        for phase in &self.phases {
            if let Some(next) = phase.next_phase_id {
                if self.find(next).is_none() {
                    return Err(CoreError::InvalidCatalog(format!(
                        "phase {} points to unknown successor {}",
                        phase.name, next
                    )));
                }
            }
        }

        for name in PhaseName::all() {
            let count = self.phases.iter().filter(|p| p.name == name).count();
            if count != 1 {
                return Err(CoreError::InvalidCatalog(format!(
                    "phase {} appears {} times",
                    name, count
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(names: &[PhaseName]) -> Vec<Phase> {
        let mut phases: Vec<Phase> = names
            .iter()
            .enumerate()
            .map(|(i, name)| Phase::new(*name, i as u32 + 1, name.display_name()))
            .collect();
        for i in 0..phases.len().saturating_sub(1) {
            phases[i].next_phase_id = Some(phases[i + 1].id);
        }
        phases
    }

    #[test]
    fn test_phase_name_parsing() {
        for name in PhaseName::all() {
            assert_eq!(PhaseName::parse(name.as_str()), Some(name));
        }
        assert_eq!(PhaseName::parse("unknown"), None);
        assert_eq!(PhaseName::INITIAL.as_str(), "interacao");
    }

    #[test]
    fn test_display_names() {
        assert_eq!(PhaseName::PreCompras.display_name(), "Pré-Compras");
        assert_eq!(
            PhaseName::LojaFechadaDefinitivamente.display_name(),
            "Loja Fechada Definitivamente"
        );
    }

    #[test]
    fn test_duration_parse() {
        assert_eq!(PhaseDuration::parse("7-14 dias"), Some(PhaseDuration { min_days: 7, max_days: 14 }));
        assert_eq!(PhaseDuration::parse("1 - 3"), Some(PhaseDuration { min_days: 1, max_days: 3 }));
        assert_eq!(PhaseDuration::parse("Definitivo"), None);
        assert_eq!(PhaseDuration::parse("9-2 dias"), None);
        assert_eq!(PhaseDuration { min_days: 2, max_days: 4 }.to_string(), "2-4 dias");
    }

    #[test]
    fn test_catalog_sorted_and_lookup() {
        let mut phases = chain(&PhaseName::all());
        phases.reverse();
        let catalog = PhaseCatalog::new(phases);

        assert_eq!(catalog.phases()[0].name, PhaseName::Interacao);
        let initial = catalog.initial().unwrap();
        assert_eq!(catalog.successor(initial.id).unwrap().name, PhaseName::PreCompras);
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_catalog_rejects_two_terminals() {
        let mut phases = chain(&PhaseName::all());
        phases[3].next_phase_id = None;
        let catalog = PhaseCatalog::new(phases);

        let err = catalog.validate().unwrap_err();
        assert!(err.to_string().contains("exactly one terminal"));
    }

    #[test]
    fn test_catalog_rejects_duplicate_order() {
        let mut phases = chain(&PhaseName::all());
        phases[2].order = phases[1].order;
        let catalog = PhaseCatalog::new(phases);

        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_catalog_rejects_dangling_successor() {
        let mut phases = chain(&PhaseName::all());
        phases[0].next_phase_id = Some(Uuid::new_v4());
        let catalog = PhaseCatalog::new(phases);

        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_catalog_rejects_missing_stage() {
        let names = &PhaseName::all()[1..];
        let catalog = PhaseCatalog::new(chain(names));

        assert!(catalog.validate().is_err());
    }
}
