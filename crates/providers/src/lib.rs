pub mod http;
pub mod mail_tm;
pub mod maildrop;
pub mod service;
pub mod temp_mail_org;

pub use mail_tm::MailTmProvider;
pub use maildrop::MaildropProvider;
pub use service::MailboxService;
pub use temp_mail_org::TempMailOrgProvider;
