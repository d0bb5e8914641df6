use tracing::info;

/// Which cooling zone a fan menu line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanZone {
    Cpu,
    Gpu,
}

impl FanZone {
    pub fn label(self) -> &'static str {
        match self {
            FanZone::Cpu => "CPU",
            FanZone::Gpu => "GPU",
        }
    }
}

/// The display collaborator the core reports to. Implementations render the
/// status label and per-zone menu lines; calls are synchronous and must not
/// block.
pub trait Presenter {
    fn set_status_label(&mut self, text: &str);
    fn set_menu_line(&mut self, zone: FanZone, text: &str);
}

/// Frontend used when no tray widget is attached: labels go to the log. A
/// real tray embedding implements [`Presenter`] over its icon and menu
/// handles instead.
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn set_status_label(&mut self, text: &str) {
        info!(label = text, "status");
    }

    fn set_menu_line(&mut self, zone: FanZone, text: &str) {
        info!(zone = zone.label(), line = text, "menu");
    }
}
