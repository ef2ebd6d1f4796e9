//! 基础设施层（Infrastructure）
//!
//! 持有稀缺资源（Browser / HTTP 客户端），只暴露页面能力。

pub mod chromium;
pub mod page_driver;
pub mod static_html;

pub use chromium::{ChromiumDriver, ChromiumPage};
pub use page_driver::{attr_of, page_text_of, text_of, DomNode, PageDriver, PageSession, WaitPolicy};
pub use static_html::StaticHtmlDriver;
