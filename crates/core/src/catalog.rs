//! Seed data for the fixed operational lifecycle.
//!
//! The data store owns the phase catalog at runtime; these records are only
//! written into an empty store on first start.

use crate::domain::{BehaviorGroup, BehaviorScope, Phase, PhaseDuration, PhaseName};

pub struct PhaseSeed {
    pub name: PhaseName,
    pub order: u32,
    pub duration: Option<(u32, u32)>,
    pub description: &'static str,
    pub notes: &'static str,
    pub next: Option<PhaseName>,
    pub allowed_to_respond: bool,
    pub permissions: &'static [&'static str],
    pub restrictions: &'static [&'static str],
}

pub const SEED_PHASES: [PhaseSeed; 9] = [
    PhaseSeed {
        name: PhaseName::Interacao,
        order: 1,
        duration: None,
        description: "Fase inicial de atração e engajamento. Foco em construir audiência e gerar expectativa.",
        notes: "Fase fundamental para construir base sólida de seguidores interessados no conceito brechó.",
        next: Some(PhaseName::PreCompras),
        allowed_to_respond: true,
        permissions: &[
            "Publicar conteúdo educativo",
            "Responder dúvidas gerais",
            "Compartilhar conceito da marca",
            "Engajar com comunidade",
        ],
        restrictions: &[
            "Não revelar preços",
            "Não aceitar desapegos",
            "Não marcar inauguração",
            "Não fazer promessas de data",
        ],
    },
    PhaseSeed {
        name: PhaseName::PreCompras,
        order: 2,
        duration: Some((7, 14)),
        description: "Preparação para início das compras. Comunicação sobre cronograma e expectativas.",
        notes: "Comunicação clara sobre cronograma é essencial para preparar a comunidade adequadamente.",
        next: Some(PhaseName::Compras),
        allowed_to_respond: true,
        permissions: &[
            "Anunciar cronograma geral",
            "Explicar processo de compras",
            "Divulgar critérios de seleção",
            "Orientar sobre preparação",
        ],
        restrictions: &[
            "Não aceitar desapegos ainda",
            "Não confirmar data exata",
            "Não revelar preços finais",
            "Não garantir aceitação",
        ],
    },
    PhaseSeed {
        name: PhaseName::Compras,
        order: 3,
        duration: Some((14, 28)),
        description: "Período ativo de recebimento de desapegos. Foco em aquisição de estoque.",
        notes: "Manter critérios de qualidade rigorosos para garantir estoque atrativo para os clientes.",
        next: Some(PhaseName::PreInauguracaoSemana1),
        allowed_to_respond: true,
        permissions: &[
            "Aceitar agendamentos",
            "Avaliar peças recebidas",
            "Comunicar critérios",
            "Orientar sobre qualidade",
        ],
        restrictions: &[
            "Não revelar preços de venda",
            "Não garantir aceitação",
            "Não confirmar data inauguração",
            "Não vender antecipadamente",
        ],
    },
    PhaseSeed {
        name: PhaseName::PreInauguracaoSemana1,
        order: 4,
        duration: Some((7, 7)),
        description: "Última semana de compras com urgência. Finalização do estoque.",
        notes: "Criar senso real de urgência sem gerar ansiedade excessiva na comunidade.",
        next: Some(PhaseName::PreInauguracaoSemana2),
        allowed_to_respond: true,
        permissions: &[
            "Comunicar urgência",
            "Acelerar agendamentos",
            "Priorizar peças estratégicas",
            "Confirmar últimas compras",
        ],
        restrictions: &[
            "Não aceitar após prazo",
            "Não revelar data exata ainda",
            "Não vender antecipadamente",
            "Não garantir nova oportunidade",
        ],
    },
    PhaseSeed {
        name: PhaseName::PreInauguracaoSemana2,
        order: 5,
        duration: Some((7, 7)),
        description: "Compras encerradas. Preparação final e comunicação da data de inauguração.",
        notes: "Momento crucial para gerar expectativa máxima e garantir presença na inauguração.",
        next: Some(PhaseName::Inauguracao),
        allowed_to_respond: true,
        permissions: &[
            "Anunciar data inauguração",
            "Mostrar preparação da loja",
            "Criar expectativa final",
            "Divulgar evento de abertura",
        ],
        restrictions: &[
            "Não aceitar mais desapegos",
            "Não vender antes da inauguração",
            "Não alterar data anunciada",
            "Não revelar estoque completo",
        ],
    },
    PhaseSeed {
        name: PhaseName::Inauguracao,
        order: 6,
        duration: Some((1, 3)),
        description: "Dia da inauguração oficial. Evento de abertura e primeiras vendas.",
        notes: "Foco total na experiência do cliente e criação de buzz positivo para a marca.",
        next: Some(PhaseName::Operacao),
        allowed_to_respond: true,
        permissions: &[
            "Vender produtos",
            "Realizar evento",
            "Atender clientes",
            "Documentar inauguração",
        ],
        restrictions: &[
            "Não aceitar desapegos no dia",
            "Não alterar preços drasticamente",
            "Não prometer novos ciclos",
            "Não sobrecarregar equipe",
        ],
    },
    PhaseSeed {
        name: PhaseName::Operacao,
        order: 7,
        duration: None,
        description: "Operação normal da loja. Vendas regulares e atendimento ao cliente.",
        notes: "Manter qualidade do atendimento e começar planejamento do próximo ciclo.",
        next: Some(PhaseName::LojaFechadaTemporariamente),
        allowed_to_respond: true,
        permissions: &[
            "Vender produtos",
            "Atender clientes",
            "Gerenciar estoque",
            "Planejar futuro",
        ],
        restrictions: &[
            "Não aceitar desapegos (ciclo fechado)",
            "Não prometer datas futuras",
            "Não alterar conceito",
            "Não sobrecarregar operação",
        ],
    },
    PhaseSeed {
        name: PhaseName::LojaFechadaTemporariamente,
        order: 8,
        duration: None,
        description: "Fechamento temporário para manutenção, reforma ou preparação de novo ciclo.",
        notes: "Manter comunicação ativa para não perder conexão com a comunidade.",
        next: Some(PhaseName::Interacao),
        allowed_to_respond: true,
        permissions: &[
            "Comunicar status",
            "Manter presença digital",
            "Planejar reabertura",
            "Realizar manutenções",
        ],
        restrictions: &[
            "Não vender produtos",
            "Não aceitar desapegos",
            "Não prometer datas sem certeza",
            "Não abandonar comunicação",
        ],
    },
    PhaseSeed {
        name: PhaseName::LojaFechadaDefinitivamente,
        order: 9,
        duration: None,
        description: "Encerramento definitivo das operações da unidade.",
        notes: "Encerramento respeitoso e transparente, mantendo boa reputação da marca.",
        next: None,
        allowed_to_respond: false,
        permissions: &[
            "Comunicar encerramento",
            "Liquidar estoque restante",
            "Finalizar relacionamentos",
            "Documentar encerramento",
        ],
        restrictions: &[
            "Não aceitar novos desapegos",
            "Não criar falsas expectativas",
            "Não abandonar responsabilidades",
            "Não deixar pendências",
        ],
    },
];

/// Builds fresh phase and behavior-group records from [`SEED_PHASES`], with
/// successor references resolved to the generated ids.
pub fn seed_catalog() -> (Vec<Phase>, Vec<BehaviorGroup>) {
    let mut phases: Vec<Phase> = SEED_PHASES
        .iter()
        .map(|seed| {
            let mut phase = Phase::new(seed.name, seed.order, seed.description);
            if let Some((min, max)) = seed.duration {
                phase = phase.with_duration(PhaseDuration {
                    min_days: min,
                    max_days: max,
                });
            }
            phase.notes = Some(seed.notes.to_string());
            phase
        })
        .collect();

    let ids: Vec<(PhaseName, uuid::Uuid)> = phases.iter().map(|p| (p.name, p.id)).collect();
    for (phase, seed) in phases.iter_mut().zip(SEED_PHASES.iter()) {
        phase.next_phase_id = seed
            .next
            .and_then(|next| ids.iter().find(|(name, _)| *name == next).map(|(_, id)| *id));
    }

    let groups = phases
        .iter()
        .zip(SEED_PHASES.iter())
        .map(|(phase, seed)| {
            BehaviorGroup::new(phase.id, phase.display_name(), seed.allowed_to_respond)
                .with_permissions(seed.permissions.iter().map(|s| s.to_string()).collect())
                .with_restrictions(seed.restrictions.iter().map(|s| s.to_string()).collect())
                .with_scope(BehaviorScope {
                    automated_responses: seed.allowed_to_respond,
                    ..Default::default()
                })
        })
        .collect();

    (phases, groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PhaseCatalog;

    #[test]
    fn test_seed_catalog_is_valid() {
        let (phases, _) = seed_catalog();
        let catalog = PhaseCatalog::new(phases);
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_single_terminal_is_permanent_closure() {
        let (phases, _) = seed_catalog();
        let catalog = PhaseCatalog::new(phases);

        let terminals: Vec<_> = catalog.terminals().collect();
        assert_eq!(terminals.len(), 1);
        assert_eq!(terminals[0].name, PhaseName::LojaFechadaDefinitivamente);

        for phase in catalog.phases().iter().filter(|p| !p.is_terminal()) {
            assert!(catalog.successor(phase.id).is_some(), "{} has no successor", phase.name);
        }
    }

    #[test]
    fn test_temporary_closure_loops_back_to_start() {
        let (phases, _) = seed_catalog();
        let catalog = PhaseCatalog::new(phases);

        let closed = catalog.by_name(PhaseName::LojaFechadaTemporariamente).unwrap();
        assert_eq!(catalog.successor(closed.id).unwrap().name, PhaseName::Interacao);
    }

    #[test]
    fn test_every_phase_gets_one_behavior_group() {
        let (phases, groups) = seed_catalog();
        assert_eq!(groups.len(), phases.len());
        for phase in &phases {
            assert_eq!(groups.iter().filter(|g| g.phase_id == phase.id).count(), 1);
        }
    }

    #[test]
    fn test_seeded_durations() {
        let (phases, _) = seed_catalog();
        let compras = phases.iter().find(|p| p.name == PhaseName::Compras).unwrap();
        assert_eq!(compras.duration().unwrap().to_string(), "14-28 dias");

        let interacao = phases.iter().find(|p| p.name == PhaseName::Interacao).unwrap();
        assert!(interacao.duration().is_none());
    }
}
