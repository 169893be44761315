/// Observability events emitted while a structure calculation runs.
///
/// Events describe the run hierarchy (model → resolution level →
/// temperature stage); the engine never reads them back, so a consumer may
/// drop any subset without affecting the result.
#[derive(Debug, Clone)]
pub enum Progress {
    ModelStart {
        index: usize,
        total: usize,
    },
    ModelFinish {
        index: usize,
    },

    LevelStart {
        bases_per_particle: u64,
        particle_count: usize,
        num_stages: u64,
    },
    StageComplete {
        step: usize,
        temperature: f64,
        violations: usize,
    },
    LevelFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
