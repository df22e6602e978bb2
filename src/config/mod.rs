mod app;
mod env;

pub use app::*;

#[cfg(test)]
mod test {
    use super::env::get_env_value_or_default;

    #[test]
    fn test_get_env_value_or_default() {
        std::env::set_var("COUNTER_ONLINE_TEST_PORT", "9090");
        std::env::set_var("COUNTER_ONLINE_TEST_INVALID_PORT", "port");
        std::env::set_var("COUNTER_ONLINE_TEST_PARAMS", "host=localhost");
        assert_eq!(get_env_value_or_default("COUNTER_ONLINE_TEST_PORT", 8080u16), 9090);
        assert_eq!(get_env_value_or_default("COUNTER_ONLINE_TEST_INVALID_PORT", 8080u16), 8080);
        assert_eq!(get_env_value_or_default("COUNTER_ONLINE_TEST_MISSING_PORT", 8080u16), 8080);
        assert_eq!(get_env_value_or_default("COUNTER_ONLINE_TEST_PARAMS", String::new()), "host=localhost");
        assert_eq!(get_env_value_or_default("COUNTER_ONLINE_TEST_MISSING_PARAMS", String::new()), "");
    }
}
