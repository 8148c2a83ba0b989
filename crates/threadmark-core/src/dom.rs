//! [`MessageView`] over rendered markup snapshots.
//!
//! A snapshot is the host page serialized to HTML. Loading a new snapshot
//! into the same view stands for a re-render: counters painted through
//! [`SnapshotView::mark_painted`] survive as long as their root message is
//! still rendered with a reply indicator.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::path::Path;

use scraper::{ElementRef, Html, Selector};

use crate::config::EngineConfig;
use crate::constants::selectors;
use crate::error::ViewError;
use crate::models::{PresentationHandle, ReplyFragment, RootFragment, ThreadLink, ViewMessage};
use crate::view::MessageView;

struct Selectors {
    post_list: Selector,
    posts: Selector,
    avatar: Selector,
    post_time: Selector,
    reference: Selector,
    indicator: Selector,
    root_indicator: Selector,
    header_buttons: Selector,
    body: Selector,
    theme_link: Selector,
    app_content: Selector,
    host_meta: Selector,
    counter: Selector,
}

impl Selectors {
    fn new(counter_class: &str) -> Result<Self, ViewError> {
        Ok(Self {
            post_list: parse_selector(selectors::POST_LIST)?,
            posts: parse_selector(selectors::POSTS)?,
            avatar: parse_selector(selectors::AVATAR)?,
            post_time: parse_selector(selectors::POST_TIME)?,
            reference: parse_selector(selectors::REFERENCE_TEXT)?,
            indicator: parse_selector(selectors::REPLY_INDICATOR)?,
            root_indicator: parse_selector(selectors::ROOT_REPLY_INDICATOR)?,
            header_buttons: parse_selector(selectors::HEADER_BUTTONS)?,
            body: parse_selector(selectors::MESSAGE_BODY)?,
            theme_link: parse_selector(selectors::THEME_LINK)?,
            app_content: parse_selector(selectors::APP_CONTENT)?,
            host_meta: parse_selector(selectors::HOST_META)?,
            counter: parse_selector(&format!(".{}", counter_class))?,
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ViewError> {
    Selector::parse(selector).map_err(|e| ViewError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

pub struct SnapshotView {
    document: RefCell<Html>,
    selectors: Selectors,
    /// Root ids a presenter painted a counter for
    painted: RefCell<HashSet<String>>,
    more_requests: Cell<usize>,
}

impl SnapshotView {
    pub fn parse(markup: &str, config: &EngineConfig) -> Result<Self, ViewError> {
        Ok(Self {
            document: RefCell::new(Html::parse_document(markup)),
            selectors: Selectors::new(&config.counter_class)?,
            painted: RefCell::new(HashSet::new()),
            more_requests: Cell::new(0),
        })
    }

    pub fn open(path: &Path, config: &EngineConfig) -> Result<Self, ViewError> {
        Self::parse(&read_snapshot(path)?, config)
    }

    /// Replace the document, as if the host re-rendered the page.
    pub fn load(&self, markup: &str) {
        *self.document.borrow_mut() = Html::parse_document(markup);
    }

    pub fn reload(&self, path: &Path) -> Result<(), ViewError> {
        self.load(&read_snapshot(path)?);
        Ok(())
    }

    /// Record that a counter is now attached to root `id`.
    pub fn mark_painted(&self, id: &str) {
        self.painted.borrow_mut().insert(id.to_string());
    }

    /// Whether a message with this id is currently rendered.
    pub fn contains_message(&self, id: &str) -> bool {
        let document = self.document.borrow();
        let found = document
            .select(&self.selectors.posts)
            .any(|post| post.value().id() == Some(id));
        found
    }

    /// Value of the host-identifying title meta.
    pub fn host_title(&self) -> Option<String> {
        let document = self.document.borrow();
        let title = document
            .select(&self.selectors.host_meta)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .map(str::to_string);
        title
    }

    /// Times older messages were requested.
    pub fn more_requests(&self) -> usize {
        self.more_requests.get()
    }

    fn read_message(&self, post: ElementRef<'_>) -> Option<ViewMessage> {
        let id = post.value().id()?.to_string();
        let is_reply = post.value().classes().any(|c| c == selectors::REPLY_CLASS);

        if is_reply {
            let earlier = post
                .value()
                .classes()
                .any(|c| c == selectors::EARLIER_ROOT_CLASS);
            let thread = if earlier {
                ThreadLink::Earlier {
                    reference_text: post.select(&self.selectors.reference).next().map(text_of),
                }
            } else {
                ThreadLink::Adjacent
            };

            return Some(ViewMessage::reply(
                id,
                ReplyFragment {
                    avatar: first_attr(post, &self.selectors.avatar, "src"),
                    posted_at: first_attr(post, &self.selectors.post_time, "datetime"),
                    thread,
                },
            ));
        }

        let buttons = post.select(&self.selectors.header_buttons).count();
        let action_anchor = buttons
            .checked_sub(1)
            .map(|last| PresentationHandle::new(id.clone(), last));

        Some(ViewMessage::root(
            id,
            RootFragment {
                reply_indicator: post.select(&self.selectors.indicator).next().map(text_of),
                action_anchor,
                body_markup: post.select(&self.selectors.body).next().map(|b| b.inner_html()),
            },
        ))
    }
}

impl MessageView for SnapshotView {
    fn visible_messages(&self) -> Vec<ViewMessage> {
        let document = self.document.borrow();
        let messages = document
            .select(&self.selectors.posts)
            .filter_map(|post| self.read_message(post))
            .collect();
        messages
    }

    fn reply_indicator_count(&self) -> usize {
        self.document
            .borrow()
            .select(&self.selectors.root_indicator)
            .count()
    }

    fn placed_counter_count(&self) -> usize {
        let document = self.document.borrow();
        let painted = self.painted.borrow();
        // Each post counts once, whether its counter is in the markup or was painted
        let placed = document
            .select(&self.selectors.posts)
            .filter(|post| post.select(&self.selectors.indicator).next().is_some())
            .filter(|post| {
                post.select(&self.selectors.counter).next().is_some()
                    || post.value().id().is_some_and(|id| painted.contains(id))
            })
            .count();
        placed
    }

    fn theme_source(&self) -> Option<String> {
        let document = self.document.borrow();
        let href = document
            .select(&self.selectors.theme_link)
            .next()
            .and_then(|link| link.value().attr("href"))
            .map(str::to_string);
        href
    }

    fn background_color(&self) -> Option<String> {
        let document = self.document.borrow();
        let content = document.select(&self.selectors.app_content).next()?;
        if let Some(color) = content.value().attr("data-background") {
            return Some(color.to_string());
        }
        content
            .value()
            .attr("style")
            .and_then(background_from_style)
    }

    fn scroll_offset(&self) -> Option<f64> {
        let document = self.document.borrow();
        let offset = document
            .select(&self.selectors.post_list)
            .next()
            .and_then(|list| list.value().attr("data-scroll-top"))
            .and_then(|raw| raw.trim().parse().ok());
        offset
    }

    fn request_more_messages(&self) {
        self.more_requests.set(self.more_requests.get() + 1);
    }
}

fn read_snapshot(path: &Path) -> Result<String, ViewError> {
    std::fs::read_to_string(path).map_err(|source| ViewError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn first_attr(scope: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    scope
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
}

/// `background-color` declaration of an inline style.
fn background_from_style(style: &str) -> Option<String> {
    style.split(';').find_map(|declaration| {
        let (name, value) = declaration.split_once(':')?;
        (name.trim().eq_ignore_ascii_case("background-color")).then(|| value.trim().to_string())
    })
}
