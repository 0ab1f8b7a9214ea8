use log::warn;

use scenelink_shared::{ObjectId, ParamAddress, ParamValue, SceneId, SceneRegistry};

#[derive(Clone, Debug, PartialEq)]
struct HistoryStep {
    address: ParamAddress,
    value: ParamValue,
}

/// A single, capped, linear history of parameter value snapshots shared
/// across all objects in a scene.
///
/// `position` tracks the last applied step. Adding a step anywhere but the
/// tail truncates the redo branch first, so history never forks; once the
/// cap is reached the oldest entry is evicted and the position stays put.
pub struct HistoryLedger {
    steps: Vec<HistoryStep>,
    position: isize,
    max_steps: usize,
}

impl HistoryLedger {
    pub fn new(max_steps: usize) -> Self {
        Self {
            steps: Vec::new(),
            position: -1,
            max_steps: max_steps.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Records a value-copy snapshot of a parameter as the newest step.
    pub fn add_step(&mut self, address: ParamAddress, value: ParamValue) {
        // adding while mid-history drops the redo branch
        let tail = (self.position + 1) as usize;
        self.steps.truncate(tail);

        if self.steps.len() == self.max_steps {
            self.steps.remove(0);
        }
        self.steps.push(HistoryStep { address, value });
        self.position = self.steps.len() as isize - 1;
    }

    /// Re-applies the most recent prior snapshot of the parameter recorded
    /// at the current position, or its default if no prior snapshot exists,
    /// then steps the position back. Returns the touched address.
    pub fn undo(&mut self, registry: &mut SceneRegistry) -> Option<ParamAddress> {
        if self.position < 0 {
            return None;
        }
        let address = self.steps[self.position as usize].address;

        let prior = self.steps[..self.position as usize]
            .iter()
            .rev()
            .find(|step| step.address == address)
            .map(|step| step.value.clone());

        match registry.resolve_mut(address) {
            Some(parameter) => match prior {
                Some(value) => {
                    if parameter.set(value).is_err() {
                        warn!("history snapshot no longer matches parameter {address:?}");
                    }
                }
                None => parameter.reset(),
            },
            None => warn!("undo target {address:?} is gone, stepping past it"),
        }

        self.position -= 1;
        Some(address)
    }

    /// Re-applies the snapshot one past the current position, if any.
    pub fn redo(&mut self, registry: &mut SceneRegistry) -> Option<ParamAddress> {
        let next = self.position + 1;
        let step = self.steps.get(next as usize)?.clone();

        match registry.resolve_mut(step.address) {
            Some(parameter) => {
                if parameter.set(step.value).is_err() {
                    warn!("history snapshot no longer matches parameter {:?}", step.address);
                }
            }
            None => warn!("redo target {:?} is gone, stepping past it", step.address),
        }

        self.position = next;
        Some(step.address)
    }

    /// Purges every entry belonging to one object, keeping the position
    /// pointed at the same logical step. Used on object deletion and scene
    /// reset.
    pub fn vanish(&mut self, scene_id: SceneId, object_id: ObjectId) {
        let old_position = self.position;
        let mut new_position = self.position;
        let mut index: isize = 0;
        self.steps.retain(|step| {
            let keep =
                !(step.address.scene_id == scene_id && step.address.object_id == object_id);
            if !keep && index <= old_position {
                new_position -= 1;
            }
            index += 1;
            keep
        });
        self.position = new_position;
    }

    pub fn clear(&mut self) {
        self.steps.clear();
        self.position = -1;
    }
}
