// Command line interface - expanding single templates and resolving manifest endpoints

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches};
use log::info;
use serde_json::Value;

use crate::config::ApiSettings;
use crate::template::{
    BodyTemplate, Charset, CollectionFormat, HeaderTemplate, QueryTemplate, UriTemplate, Variables,
};
use crate::transport::{Client, ReqwestClient};

pub fn command() -> clap::Command {
    clap::Command::new("reqforge")
        .about("Expand request templates and resolve api endpoints")
        .subcommand_required(true)
        .subcommand(
            clap::Command::new("expand")
                .about("Expand a single template")
                .arg(
                    Arg::new("template")
                        .value_name("TEMPLATE")
                        .required(true)
                        .help("Template to expand, eg /repos/{owner}"),
                )
                .arg(
                    Arg::new("kind")
                        .short('k')
                        .long("kind")
                        .value_name("KIND")
                        .value_parser(["uri", "query", "header", "body"])
                        .default_value("uri")
                        .help("How the template is expanded"),
                )
                .arg(
                    Arg::new("name")
                        .short('n')
                        .long("name")
                        .value_name("NAME")
                        .help("Query parameter or header name"),
                )
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .value_name("FORMAT")
                        .value_parser(["exploded", "csv", "ssv", "tsv", "pipes"])
                        .default_value("exploded")
                        .help("Collection format for query parameters"),
                )
                .arg(
                    Arg::new("no_encode_slash")
                        .long("no-encode-slash")
                        .action(ArgAction::SetTrue)
                        .help("Leave slashes in expanded values unencoded"),
                )
                .arg(variable_arg()),
        )
        .subcommand(
            clap::Command::new("request")
                .about("Resolve an endpoint declared in a yaml manifest")
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .value_name("CONFIG")
                        .required(true)
                        .help("Path to a YAML file declaring the api"),
                )
                .arg(
                    Arg::new("endpoint")
                        .short('e')
                        .long("endpoint")
                        .value_name("ENDPOINT")
                        .required(true)
                        .help("Name of the endpoint to resolve"),
                )
                .arg(
                    Arg::new("send")
                        .long("send")
                        .action(ArgAction::SetTrue)
                        .help("Send the request and print the response"),
                )
                .arg(variable_arg()),
        )
}

fn variable_arg() -> Arg {
    Arg::new("var")
        .short('v')
        .long("var")
        .value_name("KEY=VALUE")
        .action(ArgAction::Append)
        .help("Template variable; values that parse as json are used as json")
}

/// Parse `key=value`. The value is json when it parses as json, a plain
/// string otherwise.
pub fn parse_variable(input: &str) -> Result<(String, Value)> {
    let (key, value) = input
        .split_once('=')
        .with_context(|| format!("Invalid variable {}, expected KEY=VALUE", input))?;
    if key.is_empty() {
        bail!("Invalid variable {}, the key is empty", input);
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn variables(matches: &ArgMatches) -> Result<Variables> {
    matches
        .get_many::<String>("var")
        .into_iter()
        .flatten()
        .map(|var| parse_variable(var))
        .collect()
}

/// Run the parsed command line, returning what should be printed
pub async fn run(matches: &ArgMatches) -> Result<String> {
    match matches.subcommand() {
        Some(("expand", matches)) => expand(matches),
        Some(("request", matches)) => request(matches).await,
        _ => bail!("Unknown command"),
    }
}

fn expand(matches: &ArgMatches) -> Result<String> {
    let template = matches
        .get_one::<String>("template")
        .map(|t| t.as_str())
        .unwrap_or_default();
    let kind = matches
        .get_one::<String>("kind")
        .map(|k| k.as_str())
        .unwrap_or("uri");
    let name = matches.get_one::<String>("name").map(|n| n.as_str());
    let encode_slash = !matches.get_flag("no_encode_slash");
    let variables = variables(matches)?;

    let expanded = match (kind, name) {
        ("uri", _) => {
            UriTemplate::create_with(template, encode_slash, Charset::Utf8)?.expand(&variables)?
        }
        ("body", _) => BodyTemplate::create(template, Charset::Utf8)?.expand(&variables)?,
        ("header", Some(name)) => HeaderTemplate::create(name, &[template])?.expand(&variables)?,
        ("query", Some(name)) => {
            let format: CollectionFormat = matches
                .get_one::<String>("format")
                .map(|f| f.as_str())
                .unwrap_or("exploded")
                .parse()
                .map_err(anyhow::Error::msg)?;
            QueryTemplate::create_with(name, &[template], Charset::Utf8, format, !encode_slash)?
                .expand(&variables)?
                .unwrap_or_default()
        }
        (kind, None) => bail!("--name is required for {} templates", kind),
        (kind, _) => bail!("Unknown template kind: {}", kind),
    };
    Ok(expanded)
}

async fn request(matches: &ArgMatches) -> Result<String> {
    let config = matches
        .get_one::<String>("config")
        .context("--config is required")?;
    let name = matches
        .get_one::<String>("endpoint")
        .context("--endpoint is required")?;

    let endpoint = ApiSettings::load(config)?.endpoint(name)?;
    let request = endpoint
        .request(&variables(matches)?)
        .with_context(|| format!("Could not resolve {}", name))?;

    if !matches.get_flag("send") {
        return Ok(request.to_string());
    }

    info!("Sending {} {}", request.method(), request.url());
    let response = ReqwestClient::new()?
        .execute(&request)
        .await
        .with_context(|| format!("Request to {} failed", request.url()))?;
    info!("Received status {}", response.status);

    Ok(format!("{}\n{}", response.status, response.text()))
}
