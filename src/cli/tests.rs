use super::*;
use crate::core::dispatch::ErrorKind;

fn parse_args(argv: &[&str]) -> Args {
    Args::try_parse_from(argv)
        .unwrap_or_else(|err| panic!("argv={argv:?} should parse successfully: {err}"))
}

#[test]
fn no_subcommand_means_chat() {
    let args = parse_args(&["chatdock"]);
    assert!(args.command.is_none());
    assert!(args.provider.is_none());
}

#[test]
fn global_flags_become_overrides() {
    let argv = [
        "chatdock",
        "-p",
        "anthropic",
        "-m",
        "claude-3-haiku-20240307",
        "-t",
        "0.2",
        "say",
        "hello",
    ];
    let args = parse_args(&argv);
    let overrides = args.overrides();
    assert_eq!(overrides.provider.as_deref(), Some("anthropic"));
    assert_eq!(overrides.model.as_deref(), Some("claude-3-haiku-20240307"));
    assert_eq!(overrides.temperature, Some(0.2));
    assert_eq!(overrides.endpoint, None);

    let args = parse_args(&[
        "chatdock",
        "--endpoint",
        "http://localhost:8080/v1/chat/completions",
        "-p",
        "custom",
    ]);
    assert_eq!(
        args.overrides().endpoint.as_deref(),
        Some("http://localhost:8080/v1/chat/completions")
    );
}

#[test]
fn say_collects_the_whole_prompt() {
    let args = parse_args(&["chatdock", "say", "what", "is", "-1", "squared?"]);
    match args.command {
        Some(Commands::Say { prompt }) => assert_eq!(prompt, ["what", "is", "-1", "squared?"]),
        _ => panic!("expected say"),
    }
}

#[test]
fn set_accepts_multi_word_values() {
    let args = parse_args(&["chatdock", "set", "default-model", "openai", "gpt-4"]);
    match args.command {
        Some(Commands::Set { key, value }) => {
            assert_eq!(key.as_deref(), Some("default-model"));
            assert_eq!(value, ["openai", "gpt-4"]);
        }
        _ => panic!("expected set"),
    }

    match parse_args(&["chatdock", "set"]).command {
        Some(Commands::Set { key, value }) => {
            assert!(key.is_none());
            assert!(value.is_empty());
        }
        _ => panic!("expected set"),
    }
}

#[test]
fn mcp_subcommands_parse() {
    match parse_args(&["chatdock", "mcp", "add", "My Files", "http://localhost:3001"]).command {
        Some(Commands::Mcp { command }) => assert_eq!(
            command,
            McpCommands::Add {
                name: "My Files".to_string(),
                url: "http://localhost:3001".to_string(),
            }
        ),
        _ => panic!("expected mcp add"),
    }
    assert!(matches!(
        parse_args(&["chatdock", "mcp", "disable", "files"]).command,
        Some(Commands::Mcp {
            command: McpCommands::Disable { .. }
        })
    ));
    assert!(Args::try_parse_from(["chatdock", "mcp", "add", "files"]).is_err());
}

#[test]
fn auth_requires_a_provider() {
    assert!(Args::try_parse_from(["chatdock", "auth"]).is_err());
    assert!(matches!(
        parse_args(&["chatdock", "deauth", "openrouter"]).command,
        Some(Commands::Deauth { ref provider }) if provider == "openrouter"
    ));
}

#[test]
fn quick_fixes_point_at_the_right_command() {
    let err = DispatchError::MissingCredential("anthropic".to_string());
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(
        quick_fixes(&err),
        ["chatdock auth anthropic", "export ANTHROPIC_API_KEY=..."]
    );
    assert!(quick_fixes(&DispatchError::Status {
        status: 500,
        status_text: "Internal Server Error".to_string()
    })
    .is_empty());
}

#[test]
fn dispatch_errors_print_fixes_only_for_configuration() {
    let mut out = Vec::new();
    write_dispatch_error(&DispatchError::MissingEndpoint, &mut out).unwrap();
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.starts_with("❌ Error: "));
    assert!(printed.contains("  • chatdock set endpoint"));

    let mut out = Vec::new();
    let status = DispatchError::Status {
        status: 502,
        status_text: "Bad Gateway".to_string(),
    };
    write_dispatch_error(&status, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "❌ Error: API request failed: 502 Bad Gateway\n"
    );
}
