/// Website URLs
pub const WEBSITE_URL: &str = "https://pandaudit.com";
pub const BLOG_URL: &str = "https://pandaudit.com/blog";
pub const ABOUT_URL: &str = "https://pandaudit.com/aboutme";
pub const CHEATSHEET_URL: &str = "https://pandaudit.com/cheatsheet";
pub const STORIES_URL: &str = "https://pandaudit.com/stories";
pub const AVATAR_URL: &str = "https://pandaudit.com/assets/img/avatar-icon.png";
