//! Run with: cargo run --package server --bin generate-types --features typescript

use std::fs;
use std::path::Path;

fn main() {
    println!("Generating TypeScript types...");

    let out_dir = Path::new("frontend/src/types/generated");

    if let Err(e) = fs::create_dir_all(out_dir) {
        eprintln!("Failed to create output directory: {}", e);
        std::process::exit(1);
    }

    #[cfg(feature = "typescript")]
    {
        use ts_rs::TS;

        phasekeeper_core::UnitStatus::export_all_to(out_dir).expect("Failed to export UnitStatus");
        phasekeeper_core::Unit::export_all_to(out_dir).expect("Failed to export Unit");
        phasekeeper_core::RegisterUnitRequest::export_all_to(out_dir)
            .expect("Failed to export RegisterUnitRequest");
        phasekeeper_core::PhaseName::export_all_to(out_dir).expect("Failed to export PhaseName");
        phasekeeper_core::Phase::export_all_to(out_dir).expect("Failed to export Phase");
        phasekeeper_core::PhaseDuration::export_all_to(out_dir)
            .expect("Failed to export PhaseDuration");
        phasekeeper_core::UpdatePhaseRequest::export_all_to(out_dir)
            .expect("Failed to export UpdatePhaseRequest");
        phasekeeper_core::BehaviorGroup::export_all_to(out_dir)
            .expect("Failed to export BehaviorGroup");
        phasekeeper_core::UnitBehaviorConfig::export_all_to(out_dir)
            .expect("Failed to export UnitBehaviorConfig");
        phasekeeper_core::PhaseTransitionLog::export_all_to(out_dir)
            .expect("Failed to export PhaseTransitionLog");

        events::EventEnvelope::export_all_to(out_dir).expect("Failed to export EventEnvelope");
        events::Event::export_all_to(out_dir).expect("Failed to export Event");

        server::routes::units::TransitionRequest::export_all_to(out_dir)
            .expect("Failed to export TransitionRequest");
        server::routes::units::AdvanceRequest::export_all_to(out_dir)
            .expect("Failed to export AdvanceRequest");
        server::routes::units::CanRespondResponse::export_all_to(out_dir)
            .expect("Failed to export CanRespondResponse");
        server::routes::phases::PhaseEditRequest::export_all_to(out_dir)
            .expect("Failed to export PhaseEditRequest");
    }

    println!("TypeScript types generated in {}", out_dir.display());
}
