pub(super) fn default_name() -> String {
    "replybot".to_string()
}

pub(super) fn default_data_dir() -> String {
    "~/.replybot".to_string()
}

pub(super) fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn default_true() -> bool {
    true
}

pub(super) fn default_host() -> String {
    "127.0.0.1".to_string()
}

pub(super) fn default_port() -> u16 {
    5000
}

pub(super) fn default_deliver_url() -> String {
    "http://127.0.0.1:3333/deliver".to_string()
}
