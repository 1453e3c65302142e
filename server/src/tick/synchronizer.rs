use log::{debug, info, warn};

use festoon_shared::{Compound, Payload, StateIntegrityGuard, Tick};

use crate::{
    fastener::Fasteners,
    host::Observer,
    key_generator::{ConnectionKey, FastenerKey},
};

use super::snapshot::FastenerSnapshot;

/// What happened during one simulation step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub tick: Tick,
    pub expired: Vec<FastenerKey>,
    pub dropped: Vec<ConnectionKey>,
    pub repaired: Vec<ConnectionKey>,
    pub notified: Vec<FastenerKey>,
}

// Everything one anchor will do this step, computed from pre-step state.
struct AnchorPlan {
    key: FastenerKey,
    expire: bool,
    drop: Vec<ConnectionKey>,
    age: Vec<ConnectionKey>,
    rewrite: Vec<LogicUpdate>,
    dirty: bool,
}

impl AnchorPlan {
    fn new(key: FastenerKey) -> Self {
        Self {
            key,
            expire: false,
            drop: Vec::new(),
            age: Vec::new(),
            rewrite: Vec::new(),
            dirty: false,
        }
    }

    // Ageing alone does not warrant a broadcast.
    fn is_material(&self) -> bool {
        self.expire || self.dirty || !self.drop.is_empty() || !self.rewrite.is_empty()
    }
}

struct LogicUpdate {
    connection: ConnectionKey,
    logic: Compound,
    payload: Payload,
    repaired: bool,
}

/// Runs the per-step update of every live anchor in two phases.
///
/// The compute phase only reads the registry, so no anchor's plan can depend
/// on another anchor's mutation in the same step. The commit phase applies
/// every plan and only then broadcasts snapshots of the anchors that
/// materially changed.
pub struct TickSynchronizer {
    tick: Tick,
    revalidate_interval: u16,
}

impl TickSynchronizer {
    pub fn new(revalidate_interval: u16) -> Self {
        Self {
            tick: 0,
            revalidate_interval,
        }
    }

    /// The tick the next step will run as.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn step<O: Observer>(
        &mut self,
        fasteners: &mut Fasteners,
        guard: &StateIntegrityGuard,
        observer: &mut O,
    ) -> StepReport {
        let tick = self.tick;
        self.tick = self.tick.wrapping_add(1);

        let plans = self.compute(tick, fasteners, guard);
        Self::commit(tick, plans, fasteners, observer)
    }

    fn revalidates(&self, tick: Tick) -> bool {
        self.revalidate_interval != 0 && tick % self.revalidate_interval == 0
    }

    fn compute(
        &self,
        tick: Tick,
        fasteners: &Fasteners,
        guard: &StateIntegrityGuard,
    ) -> Vec<AnchorPlan> {
        let revalidate = self.revalidates(tick);
        let mut plans = Vec::new();

        for key in fasteners.keys() {
            let Some(fastener) = fasteners.get(&key) else {
                continue;
            };
            let mut plan = AnchorPlan::new(key);
            plan.dirty = fasteners.is_dirty(&key);

            if fastener.is_transient() && fastener.state().is_empty() {
                plan.expire = true;
                plans.push(plan);
                continue;
            }

            for connection_key in fastener.state().connections() {
                let Some(connection) = fasteners.connection(connection_key) else {
                    plan.drop.push(*connection_key);
                    continue;
                };
                let other_holds = connection.other_end(&key).is_some_and(|other| {
                    fasteners
                        .get(&other.key)
                        .is_some_and(|other| other.state().contains(connection_key))
                });
                if !other_holds {
                    plan.drop.push(*connection_key);
                    continue;
                }

                // Shared state is advanced once, by the owning side.
                if connection.fastener().key != key {
                    continue;
                }
                plan.age.push(*connection_key);

                if !revalidate {
                    continue;
                }
                match guard.validate(connection.kind(), Some(connection.logic())) {
                    Ok(_) => {
                        let mut logic = connection.logic().clone();
                        if guard.capture_record(connection.kind(), &mut logic) {
                            if let Ok(payload) =
                                guard.validate(connection.kind(), Some(&logic))
                            {
                                plan.rewrite.push(LogicUpdate {
                                    connection: *connection_key,
                                    logic,
                                    payload,
                                    repaired: false,
                                });
                            }
                        }
                    }
                    Err(error) => {
                        warn!("{} on connection {:?}, rebuilding it", error, connection_key);
                        let (logic, _) =
                            guard.repair_record(connection.kind(), Some(connection.logic()));
                        match guard.validate(connection.kind(), Some(&logic)) {
                            Ok(payload) => plan.rewrite.push(LogicUpdate {
                                connection: *connection_key,
                                logic,
                                payload,
                                repaired: true,
                            }),
                            Err(error) => warn!("rebuilt payload still invalid: {}", error),
                        }
                    }
                }
            }

            plans.push(plan);
        }

        plans
    }

    fn commit<O: Observer>(
        tick: Tick,
        plans: Vec<AnchorPlan>,
        fasteners: &mut Fasteners,
        observer: &mut O,
    ) -> StepReport {
        let mut report = StepReport {
            tick,
            ..Default::default()
        };
        let mut removed = Vec::new();

        for plan in &plans {
            for connection in &plan.drop {
                debug!("dropping dangling connection {:?} from {:?}", connection, plan.key);
                fasteners.detach(&plan.key, connection);
                report.dropped.push(*connection);
            }
            for connection in &plan.age {
                if let Some(connection) = fasteners.connection_mut(connection) {
                    connection.advance_age();
                }
            }
            for update in &plan.rewrite {
                if let Some(connection) = fasteners.connection_mut(&update.connection) {
                    connection.replace_logic(update.logic.clone(), update.payload.clone());
                    if update.repaired {
                        report.repaired.push(update.connection);
                    }
                }
            }
            if plan.expire {
                if let Some(fastener) = fasteners.remove(&plan.key) {
                    info!("expired empty transient anchor {:?}", plan.key);
                    report.expired.push(plan.key);
                    removed.push(FastenerSnapshot::removed(&fastener));
                }
            }
        }

        for snapshot in removed {
            observer.notify(&snapshot, &snapshot.site.audience());
            report.notified.push(snapshot.key);
        }
        for plan in plans.iter().filter(|plan| plan.is_material() && !plan.expire) {
            let Some(fastener) = fasteners.get(&plan.key) else {
                continue;
            };
            let snapshot = FastenerSnapshot::capture(fastener, fasteners);
            observer.notify(&snapshot, &fastener.site().audience());
            report.notified.push(plan.key);
        }

        fasteners.clear_dirty();
        report
    }
}
