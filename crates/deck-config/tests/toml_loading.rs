use figment::Jail;

use deck_config::DeckConfig;

#[test]
fn project_local_toml_is_read() {
    Jail::expect_with(|jail| {
        jail.create_dir(".taskdeck")?;
        jail.create_file(
            ".taskdeck/config.toml",
            r#"
                [server]
                bind_addr = "127.0.0.1:4000"

                [rate_limit]
                weekly_task_limit = 25
                whitelist = ["me@example.com"]
            "#,
        )?;

        let config: DeckConfig = DeckConfig::figment().extract()?;
        assert_eq!(config.server.bind_addr, "127.0.0.1:4000");
        assert_eq!(config.rate_limit.weekly_task_limit, 25);
        assert!(config.rate_limit.is_whitelisted("me@example.com"));
        Ok(())
    });
}

#[test]
fn env_beats_project_toml() {
    Jail::expect_with(|jail| {
        jail.create_dir(".taskdeck")?;
        jail.create_file(
            ".taskdeck/config.toml",
            r#"
                [server]
                bind_addr = "127.0.0.1:4000"
            "#,
        )?;
        jail.set_env("TASKDECK_SERVER__BIND_ADDR", "127.0.0.1:5000");

        let config: DeckConfig = DeckConfig::figment().extract()?;
        assert_eq!(config.server.bind_addr, "127.0.0.1:5000");
        Ok(())
    });
}
