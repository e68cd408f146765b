/// Default configuration constants used across the system.

/// Default KV v2 mount the secret is written under.
pub const DEFAULT_KV_MOUNT: &str = "secrets";

/// Default key name inside the secret.
pub const DEFAULT_SECRET_KEY: &str = "luks";

/// Config file names searched in the working directory, in order.
pub const CONFIG_FILE_CANDIDATES: &[&str] = &[
    "vault-handoff.json",
    "vault-handoff.json5",
    "vault-handoff.yaml",
    "vault-handoff.yml",
    "vault-handoff.toml",
];

/// Directory under the user config dir holding `config.toml`.
pub const CONFIG_DIR_NAME: &str = "vault-handoff";
