use crate::core::config::data::Config;
use crate::core::providers::{DEFAULT_PROVIDER, DEFAULT_TEMPERATURE};

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.default_provider {
            Some(provider) => println!("  default-provider: {provider}"),
            None => println!("  default-provider: (unset, using {DEFAULT_PROVIDER})"),
        }
        match self.temperature {
            Some(temperature) => println!("  temperature: {temperature}"),
            None => println!("  temperature: (unset, using {DEFAULT_TEMPERATURE})"),
        }
        match &self.custom_endpoint {
            Some(endpoint) => println!("  endpoint: {endpoint}"),
            None => println!("  endpoint: (unset)"),
        }
        println!("  profile-name: {}", self.profile_name());
        if self.default_models.is_empty() {
            println!("  default-models: (none set)");
        } else {
            println!("  default-models:");
            let mut models: Vec<_> = self.default_models.iter().collect();
            models.sort();
            for (provider, model) in models {
                println!("    {provider}: {model}");
            }
        }
        if !self.endpoint_overrides.is_empty() {
            println!("  endpoint-overrides:");
            let mut overrides: Vec<_> = self.endpoint_overrides.iter().collect();
            overrides.sort();
            for (provider, url) in overrides {
                println!("    {provider}: {url}");
            }
        }
        println!("  mcp-servers: {}", self.mcp_servers.len());
    }
}
