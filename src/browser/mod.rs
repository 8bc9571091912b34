//! Browser automation module
//!
//! This module provides headless browser control through ChromiumOxide:
//! lifecycle management, navigation, and rendered-HTML capture.

pub mod capture;
pub mod controller;
pub mod navigation;

pub use capture::PageCapture;
pub use controller::{BrowserConfig, BrowserController, PageHandle};
pub use navigation::{NavigationOptions, NavigationResult, PageNavigator, UrlValidator, WaitUntil};
