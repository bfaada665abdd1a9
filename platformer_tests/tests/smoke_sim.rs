use platformer_sim::{config::SimConfig, script::InputScript, Simulation};

/// Smoke test: the host can run a few paced frames without panicking.
#[tokio::test]
async fn sim_runs_few_realtime_frames() -> anyhow::Result<()> {
    let mut sim = Simulation::new(SimConfig::default(), InputScript::new())?;
    let snap = sim.run_realtime(3).await;
    assert_eq!(snap.frame, 3);
    assert!(sim.script_finished());
    Ok(())
}
