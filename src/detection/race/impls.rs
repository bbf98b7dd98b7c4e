// Standard library
use std::collections::HashMap;
use std::sync::Arc;

// 3rd party crates
use tokio::sync::{mpsc, RwLock};
use tokio_util::sync::CancellationToken;

// Project imports
use crate::detection::constants::ALTERNATIVE_START_DELAY;
use crate::detection::traits::Protocol;
use crate::detection::types::{DetectMethod, DetectedIp};
use crate::family::types::IpFamily;
use crate::logging::types::Reporter;

// Current module imports
use super::types::{AttemptOutcome, RaceDetector};

impl RaceDetector {
    pub fn new(protocol: Arc<dyn Protocol>) -> Self {
        Self {
            protocol,
            memo: RwLock::new(HashMap::new()),
        }
    }

    /// Name of the underlying protocol.
    pub fn protocol_name(&self) -> &'static str {
        self.protocol.name()
    }

    /// Detects the public address for one family.
    ///
    /// Races the primary and the alternative endpoint unless the protocol
    /// has no alternative for this family or an earlier race already
    /// produced a winner; both cases collapse into a single direct call.
    /// Returns `None` when every attempted endpoint failed or `cancel`
    /// fired first.
    pub async fn detect(
        &self,
        cancel: &CancellationToken,
        reporter: &Reporter,
        family: IpFamily,
    ) -> Option<DetectedIp> {
        if !self.protocol.has_alternative(family) {
            return self.direct(cancel, reporter, family, DetectMethod::Primary).await;
        }
        let remembered = self.memo.read().await.get(&family).copied();
        if let Some(winner) = remembered {
            return self.direct(cancel, reporter, family, winner).await;
        }
        self.race(cancel, reporter, family).await
    }

    async fn direct(
        &self,
        cancel: &CancellationToken,
        reporter: &Reporter,
        family: IpFamily,
        method: DetectMethod,
    ) -> Option<DetectedIp> {
        self.protocol
            .get_ip(cancel, reporter, family, method)
            .await
            .map(|ip| DetectedIp { ip, method })
    }

    async fn race(
        &self,
        cancel: &CancellationToken,
        reporter: &Reporter,
        family: IpFamily,
    ) -> Option<DetectedIp> {
        // One token spanning both attempts: cancelling the caller's token
        // cancels the race, declaring a winner cancels the loser.
        let race_token = cancel.child_token();
        let (tx, mut rx) = mpsc::channel::<AttemptOutcome>(2);

        self.spawn_attempt(&race_token, reporter, family, DetectMethod::Primary, &tx);

        let delay = tokio::time::sleep(ALTERNATIVE_START_DELAY);
        tokio::pin!(delay);
        let mut alternative_started = false;
        let mut primary_log: Option<Reporter> = None;
        let mut primary_failed = false;
        let mut alternative_failed = false;

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    // Abandoned from outside: neither queue is flushed; a
                    // dead attempt's partial diagnostics are not actionable.
                    race_token.cancel();
                    return None;
                }

                () = &mut delay, if !alternative_started => {
                    alternative_started = true;
                    self.spawn_attempt(
                        &race_token,
                        reporter,
                        family,
                        DetectMethod::Alternative,
                        &tx,
                    );
                }

                outcome = rx.recv() => {
                    let Some(outcome) = outcome else {
                        race_token.cancel();
                        return None;
                    };
                    match outcome.ip {
                        Some(ip) => {
                            self.memo.write().await.insert(family, outcome.method);
                            outcome.log.flush();
                            if outcome.method == DetectMethod::Alternative {
                                reporter.notice(format!(
                                    "the alternative endpoint of protocol \"{}\" answered first and will be preferred from now on",
                                    self.protocol.name()
                                ));
                            }
                            race_token.cancel();
                            return Some(DetectedIp {
                                ip,
                                method: outcome.method,
                            });
                        }
                        None => {
                            match outcome.method {
                                DetectMethod::Primary => {
                                    primary_failed = true;
                                    primary_log = Some(outcome.log);
                                    if !alternative_started {
                                        // Don't make the user wait out the
                                        // remaining delay on a dead primary.
                                        alternative_started = true;
                                        self.spawn_attempt(
                                            &race_token,
                                            reporter,
                                            family,
                                            DetectMethod::Alternative,
                                            &tx,
                                        );
                                    }
                                }
                                _ => alternative_failed = true,
                            }
                            if primary_failed && alternative_failed {
                                // Show the first-attempted path's diagnostics.
                                if let Some(log) = primary_log.take() {
                                    log.flush();
                                }
                                race_token.cancel();
                                return None;
                            }
                        }
                    }
                }
            }
        }
    }

    fn spawn_attempt(
        &self,
        race_token: &CancellationToken,
        reporter: &Reporter,
        family: IpFamily,
        method: DetectMethod,
        tx: &mpsc::Sender<AttemptOutcome>,
    ) {
        let protocol = Arc::clone(&self.protocol);
        let token = race_token.child_token();
        let log = reporter.queued();
        let tx = tx.clone();
        tokio::spawn(async move {
            let ip = tokio::select! {
                () = token.cancelled() => None,
                ip = protocol.get_ip(&token, &log, family, method) => ip,
            };
            let _ = tx.send(AttemptOutcome { method, ip, log }).await;
        });
    }
}
