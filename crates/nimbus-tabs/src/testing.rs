//! Recording page views for tests

use parking_lot::Mutex;
use std::sync::Arc;

use crate::tab::TabId;
use crate::view::{PageView, PageViewFactory, Partition};

#[derive(Debug, Default)]
pub struct ViewLog {
    pub partition: Option<Partition>,
    pub loads: Vec<String>,
    pub title: Option<String>,
    pub loading: bool,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub back_calls: usize,
    pub forward_calls: usize,
    pub reloads: usize,
    pub stop_calls: usize,
    pub detached: bool,
}

pub type SharedLog = Arc<Mutex<ViewLog>>;

pub struct RecordingView {
    log: SharedLog,
}

impl RecordingView {
    pub fn new() -> (Self, SharedLog) {
        let log = SharedLog::default();
        (
            Self {
                log: Arc::clone(&log),
            },
            log,
        )
    }
}

impl PageView for RecordingView {
    fn load_url(&mut self, url: &str) {
        let mut log = self.log.lock();
        log.loads.push(url.to_string());
        log.loading = true;
    }

    fn title(&self) -> Option<String> {
        self.log.lock().title.clone()
    }

    fn can_go_back(&self) -> bool {
        self.log.lock().can_go_back
    }

    fn can_go_forward(&self) -> bool {
        self.log.lock().can_go_forward
    }

    fn go_back(&mut self) {
        self.log.lock().back_calls += 1;
    }

    fn go_forward(&mut self) {
        self.log.lock().forward_calls += 1;
    }

    fn reload(&mut self) {
        self.log.lock().reloads += 1;
    }

    fn is_loading(&self) -> bool {
        self.log.lock().loading
    }

    fn stop(&mut self) {
        let mut log = self.log.lock();
        log.stop_calls += 1;
        log.loading = false;
    }

    fn detach(&mut self) {
        self.log.lock().detached = true;
    }
}

/// Factory that hands out [`RecordingView`]s and remembers their logs
#[derive(Clone, Default)]
pub struct RecordingFactory {
    views: Arc<Mutex<Vec<(TabId, SharedLog)>>>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self, tab_id: TabId) -> Option<SharedLog> {
        self.views
            .lock()
            .iter()
            .find(|(id, _)| *id == tab_id)
            .map(|(_, log)| Arc::clone(log))
    }

    pub fn created(&self) -> usize {
        self.views.lock().len()
    }
}

impl PageViewFactory for RecordingFactory {
    fn create_view(
        &mut self,
        tab_id: TabId,
        partition: &Partition,
        url: &str,
    ) -> Box<dyn PageView> {
        let (view, log) = RecordingView::new();
        {
            let mut entry = log.lock();
            entry.partition = Some(partition.clone());
            entry.loads.push(url.to_string());
            entry.loading = true;
        }
        self.views.lock().push((tab_id, log));
        Box::new(view)
    }
}
