use figment::Jail;

use deck_config::DeckConfig;

#[test]
fn env_vars_override_defaults() {
    Jail::expect_with(|jail| {
        jail.set_env("TASKDECK_SERVER__BIND_ADDR", "0.0.0.0:9000");
        jail.set_env("TASKDECK_RATE_LIMIT__WEEKLY_TASK_LIMIT", "7");

        let config: DeckConfig = DeckConfig::figment().extract()?;
        assert_eq!(config.server.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.rate_limit.weekly_task_limit, 7);
        // Untouched sections keep their defaults.
        assert_eq!(config.api.timeout_secs, 10);
        Ok(())
    });
}

#[test]
fn nested_api_section_maps_with_double_underscore() {
    Jail::expect_with(|jail| {
        jail.set_env("TASKDECK_API__BASE_URL", "http://10.0.0.2:8787/api");
        jail.set_env("TASKDECK_API__SESSION_TOKEN", "tok-123");

        let config: DeckConfig = DeckConfig::figment().extract()?;
        assert_eq!(config.api.base_url, "http://10.0.0.2:8787/api");
        assert_eq!(config.api.session_token, "tok-123");
        Ok(())
    });
}
