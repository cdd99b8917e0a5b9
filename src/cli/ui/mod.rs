mod painter;
mod reply_view;
mod summary_view;
mod table;

pub(crate) use self::painter::Painter;
pub(crate) use self::reply_view::ReplyView;
pub(crate) use self::summary_view::{NodeSummaryView, SelfTestSummaryView, SendSummaryView};
