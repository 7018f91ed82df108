mod browser;
pub mod mock_browser;
pub mod webdriver;

pub use browser::Browser;
pub use mock_browser::{MockBrowser, MockPage};
pub use webdriver::WebDriverBrowser;
