//! Setting handlers, one per configuration key.

use super::{success_set, success_unset, validate_provider, SettingError, SettingHandler};
use crate::core::config::Config;

/// Handler for the `default-provider` setting.
pub struct DefaultProviderHandler;

impl SettingHandler for DefaultProviderHandler {
    fn key(&self) -> &'static str {
        "default-provider"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To set a default provider, specify the provider:",
                example: "chatdock set default-provider anthropic",
            });
        }

        let provider = validate_provider(&args.join(" "))?;
        let message = success_set(self.key(), &provider);
        config.default_provider = Some(provider);
        Ok(message)
    }

    fn unset(&self, _arg: Option<&str>, config: &mut Config) -> Result<String, SettingError> {
        config.default_provider = None;
        Ok(success_unset(self.key()))
    }
}

/// Handler for the `default-model` setting, keyed by provider.
pub struct DefaultModelHandler;

impl SettingHandler for DefaultModelHandler {
    fn key(&self) -> &'static str {
        "default-model"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        if args.len() < 2 {
            return Err(SettingError::MissingArgs {
                hint: "To set a default model, specify the provider and model:",
                example: "chatdock set default-model openai gpt-4",
            });
        }

        let provider = validate_provider(&args[0])?;
        let model = args[1..].join(" ");
        let message = format!("✅ Set default-model for provider '{provider}' to: {model}");
        config.set_default_model(provider, model);
        Ok(message)
    }

    fn unset(&self, arg: Option<&str>, config: &mut Config) -> Result<String, SettingError> {
        let provider = arg.ok_or(SettingError::MissingArgs {
            hint: "To unset a default model, specify the provider:",
            example: "chatdock unset default-model openai",
        })?;

        let provider = validate_provider(provider)?;
        config.unset_default_model(&provider);
        Ok(format!("✅ Unset default-model for provider: {provider}"))
    }
}

/// Handler for the `temperature` setting.
pub struct TemperatureHandler;

impl SettingHandler for TemperatureHandler {
    fn key(&self) -> &'static str {
        "temperature"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let Some(input) = args.first() else {
            return Err(SettingError::MissingArgs {
                hint: "To set the sampling temperature, give a number between 0 and 2:",
                example: "chatdock set temperature 0.7",
            });
        };

        let temperature = input
            .parse::<f64>()
            .ok()
            .filter(|value| (0.0..=2.0).contains(value))
            .ok_or_else(|| SettingError::InvalidValue {
                kind: "Temperature",
                input: input.clone(),
                hint: "Use a number between 0 and 2, e.g. 0.7",
            })?;

        config.temperature = Some(temperature);
        Ok(success_set(self.key(), &temperature.to_string()))
    }

    fn unset(&self, _arg: Option<&str>, config: &mut Config) -> Result<String, SettingError> {
        config.temperature = None;
        Ok(success_unset(self.key()))
    }
}

/// Handler for the `endpoint` setting.
///
/// - `chatdock set endpoint <url>` sets the endpoint of the `custom` provider
/// - `chatdock set endpoint <provider> <url>` points a built-in provider
///   somewhere else, e.g. a remote Ollama host
pub struct EndpointHandler;

impl EndpointHandler {
    fn validate_url(input: &str) -> Result<String, SettingError> {
        reqwest::Url::parse(input)
            .map(|_| input.to_string())
            .map_err(|_| SettingError::InvalidValue {
                kind: "Endpoint",
                input: input.to_string(),
                hint: "Use an absolute URL, e.g. http://localhost:8080/v1/chat/completions",
            })
    }
}

impl SettingHandler for EndpointHandler {
    fn key(&self) -> &'static str {
        "endpoint"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        match args {
            [url] => {
                let url = Self::validate_url(url)?;
                let message = success_set(self.key(), &url);
                config.custom_endpoint = Some(url);
                Ok(message)
            }
            [provider, url] => {
                let provider = validate_provider(provider)?;
                let url = Self::validate_url(url)?;
                let message = format!("✅ Set endpoint for provider '{provider}' to: {url}");
                if provider == "custom" {
                    config.custom_endpoint = Some(url);
                } else {
                    config.endpoint_overrides.insert(provider, url);
                }
                Ok(message)
            }
            _ => Err(SettingError::MissingArgs {
                hint: "To set an endpoint, give a URL, optionally after a provider:",
                example: "chatdock set endpoint ollama http://gpu-box:11434/api/chat",
            }),
        }
    }

    fn unset(&self, arg: Option<&str>, config: &mut Config) -> Result<String, SettingError> {
        match arg {
            None => {
                config.custom_endpoint = None;
                Ok(success_unset(self.key()))
            }
            Some(provider) => {
                let provider = validate_provider(provider)?;
                if provider == "custom" {
                    config.custom_endpoint = None;
                } else {
                    config.endpoint_overrides.remove(&provider);
                }
                Ok(format!("✅ Unset endpoint for provider: {provider}"))
            }
        }
    }
}

/// Handler for the `profile-name` setting.
pub struct ProfileNameHandler;

impl SettingHandler for ProfileNameHandler {
    fn key(&self) -> &'static str {
        "profile-name"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let name = args.join(" ").trim().to_string();
        if name.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To set the name shown for you in transcripts:",
                example: "chatdock set profile-name Ada",
            });
        }

        let message = success_set(self.key(), &name);
        config.profile_name = Some(name);
        Ok(message)
    }

    fn unset(&self, _arg: Option<&str>, config: &mut Config) -> Result<String, SettingError> {
        config.profile_name = None;
        Ok(success_unset(self.key()))
    }
}
