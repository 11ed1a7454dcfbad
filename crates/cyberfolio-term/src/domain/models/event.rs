use cyberfolio_core::BootPhase;
use cyberfolio_core::FolioError;
use cyberfolio_core::LinkPreview;
use cyberfolio_core::SessionEvent;

#[derive(Debug)]
pub enum Event {
    Boot(BootPhase),
    Session(SessionEvent),
    PreviewLoaded(String, Result<LinkPreview, FolioError>),
    KeyboardCharInput(char),
    KeyboardBackspace,
    KeyboardCTRLC,
    KeyboardEnter,
    KeyboardPaste(String),
    UITick,
    UIScrollDown,
    UIScrollUp,
    UIScrollPageDown,
    UIScrollPageUp,
}
