//! Integration tests for the direct, relayed and fallback file savers.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use beautifier_relay::{
    DownloadCallback, DownloadHost, DownloadOptions, DownloadRelay, DownloadResponse, HostError,
    RelayMessage,
};
use beautifier_render::save::{ALERT_PREFIX, ReplyCallback, SEND_FAILED_MESSAGE};
use beautifier_render::{
    ChannelError, DirectSaver, DownloadFile, FallbackSaver, FileSaver, Notifier, PageDownloads,
    RelayChannel, RelayedSaver, SaveError,
};

fn file() -> DownloadFile {
    DownloadFile {
        content: "{\n  \"a\": 1\n}".to_string(),
        filename: "beautified.json".to_string(),
    }
}

// -- Page downloads --

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkOutcome {
    Click,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PageEvent {
    CreateUrl { content: String, mime_type: String },
    Revoke(String),
    Click { url: String, filename: String },
    RemoveLink(u32),
}

/// Records every page call. Deferred tasks wait in a queue until
/// [`FakePage::run_deferred`].
struct FakePage {
    supported: bool,
    link: LinkOutcome,
    events: RefCell<Vec<PageEvent>>,
    deferred: RefCell<VecDeque<(Duration, Box<dyn FnOnce()>)>>,
    next_link: RefCell<u32>,
}

impl FakePage {
    fn new(supported: bool, link: LinkOutcome) -> Self {
        Self {
            supported,
            link,
            events: RefCell::new(Vec::new()),
            deferred: RefCell::new(VecDeque::new()),
            next_link: RefCell::new(1),
        }
    }

    fn events(&self) -> Vec<PageEvent> {
        self.events.borrow().clone()
    }

    fn delays(&self) -> Vec<Duration> {
        self.deferred.borrow().iter().map(|(d, _)| *d).collect()
    }

    fn run_deferred(&self) {
        let tasks: Vec<_> = self.deferred.borrow_mut().drain(..).collect();
        for (_, task) in tasks {
            task();
        }
    }
}

impl PageDownloads for FakePage {
    type Link = u32;

    fn is_supported(&self) -> bool {
        self.supported
    }

    fn create_object_url(&self, content: &str, mime_type: &str) -> Result<String, SaveError> {
        self.events.borrow_mut().push(PageEvent::CreateUrl {
            content: content.to_string(),
            mime_type: mime_type.to_string(),
        });
        Ok("blob:page/1".to_string())
    }

    fn revoke_object_url(&self, url: &str) {
        self.events.borrow_mut().push(PageEvent::Revoke(url.to_string()));
    }

    fn click_link(&self, url: &str, filename: &str) -> Result<u32, SaveError> {
        if self.link == LinkOutcome::Fail {
            return Err(SaveError::Link("click blocked".to_string()));
        }
        self.events.borrow_mut().push(PageEvent::Click {
            url: url.to_string(),
            filename: filename.to_string(),
        });
        let mut next = self.next_link.borrow_mut();
        let id = *next;
        *next += 1;
        Ok(id)
    }

    fn remove_link(&self, link: &u32) {
        self.events.borrow_mut().push(PageEvent::RemoveLink(*link));
    }

    fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        self.deferred.borrow_mut().push_back((delay, task));
    }
}

fn direct(supported: bool, link: LinkOutcome) -> DirectSaver<FakePage> {
    DirectSaver::new(FakePage::new(supported, link), Duration::from_millis(100))
}

// -- Relay channel and notifier --

#[derive(Clone, Default)]
struct Alerts(Rc<RefCell<Vec<String>>>);

impl Alerts {
    fn messages(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

impl Notifier for Alerts {
    fn alert(&self, message: &str) {
        self.0.borrow_mut().push(message.to_string());
    }
}

/// Background host that accepts every download as id 7, or rejects it.
#[derive(Default)]
struct FakeHost {
    reject: Option<String>,
    downloads: RefCell<Vec<DownloadOptions>>,
}

impl DownloadHost for FakeHost {
    fn create_object_url(&self, _content: &str, _mime_type: &str) -> Result<String, HostError> {
        Ok("blob:background/1".to_string())
    }

    fn revoke_object_url(&self, _url: &str) {}

    fn download(&self, options: DownloadOptions, on_complete: DownloadCallback) {
        self.downloads.borrow_mut().push(options);
        match &self.reject {
            Some(message) => on_complete(Err(HostError(message.clone()))),
            None => on_complete(Ok(7)),
        }
    }
}

/// Delivers messages straight into a relay, the way the runtime would.
struct LoopbackChannel {
    relay: DownloadRelay<FakeHost>,
    sent: RefCell<Vec<RelayMessage>>,
    replies: Rc<RefCell<Vec<DownloadResponse>>>,
}

impl LoopbackChannel {
    fn new(host: FakeHost) -> Self {
        Self {
            relay: DownloadRelay::new(host),
            sent: RefCell::new(Vec::new()),
            replies: Rc::default(),
        }
    }
}

impl RelayChannel for LoopbackChannel {
    fn send(&self, message: RelayMessage, on_reply: ReplyCallback) -> Result<(), ChannelError> {
        self.sent.borrow_mut().push(message.clone());
        let replies = Rc::clone(&self.replies);
        let _ = self.relay.handle(
            message,
            Box::new(move |response| {
                replies.borrow_mut().push(response.clone());
                on_reply(Ok(response));
            }),
        );
        Ok(())
    }
}

/// Channel whose send fails, or whose reply is a runtime error.
enum BrokenChannel {
    Unsendable,
    LastError(&'static str),
}

impl RelayChannel for BrokenChannel {
    fn send(&self, _message: RelayMessage, on_reply: ReplyCallback) -> Result<(), ChannelError> {
        match self {
            Self::Unsendable => Err(ChannelError("Extension context invalidated.".to_string())),
            Self::LastError(message) => {
                on_reply(Err(ChannelError((*message).to_string())));
                Ok(())
            }
        }
    }
}

fn relayed(host: FakeHost) -> (RelayedSaver<LoopbackChannel, Alerts>, Alerts) {
    let alerts = Alerts::default();
    (RelayedSaver::new(LoopbackChannel::new(host), alerts.clone()), alerts)
}

// -- Direct --

#[test]
fn test_direct_save_clicks_link_then_cleans_up() {
    let mut saver = direct(true, LinkOutcome::Click);
    assert!(saver.is_available());
    saver.save(&file()).unwrap();

    let page = saver.host();
    assert_eq!(
        page.events(),
        [
            PageEvent::CreateUrl {
                content: file().content,
                mime_type: "application/json".to_string(),
            },
            PageEvent::Click {
                url: "blob:page/1".to_string(),
                filename: "beautified.json".to_string(),
            },
        ]
    );
    assert_eq!(page.delays(), [Duration::from_millis(100)]);

    page.run_deferred();
    let events = page.events();
    assert_eq!(
        events[2..],
        [PageEvent::RemoveLink(1), PageEvent::Revoke("blob:page/1".to_string())]
    );
}

#[test]
fn test_direct_click_failure_revokes_url() {
    let mut saver = direct(true, LinkOutcome::Fail);
    let err = saver.save(&file()).unwrap_err();
    assert_eq!(err, SaveError::Link("click blocked".to_string()));
    assert_eq!(
        saver.host().events().last(),
        Some(&PageEvent::Revoke("blob:page/1".to_string()))
    );
    assert!(saver.host().delays().is_empty());
}

#[test]
fn test_repeated_direct_saves_are_independent() {
    let mut saver = direct(true, LinkOutcome::Click);
    saver.save(&file()).unwrap();
    saver.save(&file()).unwrap();
    saver.host().run_deferred();
    let removed: Vec<_> = saver
        .host()
        .events()
        .into_iter()
        .filter(|e| matches!(e, PageEvent::RemoveLink(_)))
        .collect();
    assert_eq!(removed, [PageEvent::RemoveLink(1), PageEvent::RemoveLink(2)]);
}

// -- Relayed --

#[test]
fn test_relayed_save_reaches_host_download() {
    let (mut saver, alerts) = relayed(FakeHost::default());
    saver.save(&file()).unwrap();

    let channel = saver.channel();
    assert_eq!(
        *channel.sent.borrow(),
        [RelayMessage::download(&file().content, "beautified.json")]
    );
    let downloads = channel.relay.host().downloads.borrow();
    assert_eq!(downloads.len(), 1);
    assert_eq!(downloads[0].filename, "beautified.json");
    assert!(downloads[0].save_as);
    assert_eq!(
        *channel.replies.borrow(),
        [DownloadResponse::Success { download_id: 7 }]
    );
    assert!(alerts.messages().is_empty());
}

#[test]
fn test_relay_error_response_raises_alert() {
    let (mut saver, alerts) = relayed(FakeHost {
        reject: Some("Invalid filename".to_string()),
        ..FakeHost::default()
    });
    saver.save(&file()).unwrap();
    assert_eq!(alerts.messages(), ["JSON Beautifier Error: Invalid filename"]);
}

#[test]
fn test_channel_error_raises_alert() {
    let alerts = Alerts::default();
    let mut saver = RelayedSaver::new(
        BrokenChannel::LastError("Could not establish connection."),
        alerts.clone(),
    );
    saver.save(&file()).unwrap();
    assert_eq!(
        alerts.messages(),
        [format!("{ALERT_PREFIX}Could not establish connection.")]
    );
}

#[test]
fn test_unsendable_message_raises_generic_alert() {
    let alerts = Alerts::default();
    let mut saver = RelayedSaver::new(BrokenChannel::Unsendable, alerts.clone());
    let err = saver.save(&file()).unwrap_err();
    assert!(matches!(err, SaveError::Channel(_)));
    assert_eq!(alerts.messages(), [format!("{ALERT_PREFIX}{SEND_FAILED_MESSAGE}")]);
}

// -- Fallback --

#[test]
fn test_fallback_prefers_working_primary() {
    let (relay, alerts) = relayed(FakeHost::default());
    let mut saver = FallbackSaver::new(direct(true, LinkOutcome::Click), relay);
    saver.save(&file()).unwrap();
    assert!(saver.fallback().channel().sent.borrow().is_empty());
    assert_eq!(saver.primary().host().delays().len(), 1);
    assert!(alerts.messages().is_empty());
}

#[test]
fn test_failing_primary_falls_back_once() {
    let (relay, alerts) = relayed(FakeHost::default());
    let mut saver = FallbackSaver::new(direct(true, LinkOutcome::Fail), relay);
    saver.save(&file()).unwrap();
    assert_eq!(saver.fallback().channel().sent.borrow().len(), 1);
    assert_eq!(
        *saver.fallback().channel().replies.borrow(),
        [DownloadResponse::Success { download_id: 7 }]
    );
    assert!(alerts.messages().is_empty());
}

#[test]
fn test_unavailable_primary_is_skipped() {
    let (relay, _alerts) = relayed(FakeHost::default());
    let mut saver = FallbackSaver::new(direct(false, LinkOutcome::Click), relay);
    assert!(saver.is_available());
    saver.save(&file()).unwrap();
    assert!(saver.primary().host().events().is_empty());
    assert_eq!(saver.fallback().channel().sent.borrow().len(), 1);
}

#[test]
fn test_both_failing_reports_fallback_error() {
    let alerts = Alerts::default();
    let relay = RelayedSaver::new(BrokenChannel::Unsendable, alerts.clone());
    let mut saver = FallbackSaver::new(direct(true, LinkOutcome::Fail), relay);
    assert!(matches!(saver.save(&file()), Err(SaveError::Channel(_))));
    assert_eq!(alerts.messages().len(), 1);
}
