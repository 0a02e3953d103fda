use std::{sync::Arc, time::Duration};

use ac_common::{AcController, ControllerConfig, CycleConfig, CycleMode, FanSpeed};
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
    time::sleep,
};
use tracing::{info, warn};

use crate::driver::BoxedDriver;

pub type SharedController = Arc<Mutex<AcController<BoxedDriver>>>;

/// Duty-cycle runner: alternates the controller between the configured
/// active mode and fully off at fixed intervals until stopped.
///
/// The task slot is guarded by one mutex, so start, stop, and the
/// running check observe-and-transition atomically: no duplicate task
/// can be spawned and no spawn can race a teardown.
pub struct CycleRunner {
    controller: SharedController,
    settings: Arc<Mutex<CycleConfig>>,
    on_phase: Duration,
    off_phase: Duration,
    task: Mutex<Option<CycleTask>>,
}

struct CycleTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl CycleRunner {
    pub fn new(controller: SharedController, config: &ControllerConfig) -> Self {
        Self {
            controller,
            settings: Arc::new(Mutex::new(CycleConfig::initial())),
            on_phase: Duration::from_secs(config.on_phase_secs),
            off_phase: Duration::from_secs(config.off_phase_secs),
            task: Mutex::new(None),
        }
    }

    /// Spawns the cycle task. A second call while running is a no-op.
    pub async fn start(&self) {
        let mut task = self.task.lock().await;
        if task.is_some() {
            return;
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run_loop(
            Arc::clone(&self.controller),
            Arc::clone(&self.settings),
            self.on_phase,
            self.off_phase,
            shutdown_rx,
        ));
        *task = Some(CycleTask {
            shutdown: shutdown_tx,
            handle,
        });
        info!("cycle started");
    }

    /// Signals the cycle task and waits for it to exit before forcing
    /// the unit off. When it returns, no cycle phase is in flight.
    pub async fn stop(&self) {
        let mut task = self.task.lock().await;
        if let Some(task) = task.take() {
            let _ = task.shutdown.send(true);
            if let Err(err) = task.handle.await {
                warn!("cycle task join failed: {err}");
            }
            info!("cycle stopped");
        }
        self.controller.lock().await.turn_off();
    }

    pub async fn is_running(&self) -> bool {
        self.task.lock().await.is_some()
    }

    pub async fn settings(&self) -> CycleConfig {
        *self.settings.lock().await
    }

    /// Updates the settings applied on the next activation phase. The
    /// currently-running phase is not touched.
    pub async fn set_settings(&self, mode: CycleMode, speed: FanSpeed) {
        let mut settings = self.settings.lock().await;
        settings.mode = mode;
        settings.speed = speed;
    }
}

async fn run_loop(
    controller: SharedController,
    settings: Arc<Mutex<CycleConfig>>,
    on_phase: Duration,
    off_phase: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let config = *settings.lock().await;
        {
            let mut ac = controller.lock().await;
            match config.mode {
                CycleMode::Cool => ac.set_cooling(config.speed),
                CycleMode::Fan => ac.set_fan(config.speed),
            }
        }
        info!(
            "cycle active phase: {} {}",
            config.mode.as_str(),
            config.speed.as_str()
        );
        if wait_or_shutdown(on_phase, &mut shutdown).await {
            break;
        }

        controller.lock().await.turn_off();
        info!("cycle rest phase");
        if wait_or_shutdown(off_phase, &mut shutdown).await {
            break;
        }
    }
}

/// Cancellable timed wait; true means shutdown was signalled.
async fn wait_or_shutdown(duration: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        _ = sleep(duration) => false,
        _ = shutdown.changed() => true,
    }
}
