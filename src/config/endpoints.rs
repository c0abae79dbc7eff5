use crate::{
    config::yml_settings::{ApiSettings, EndpointSettings},
    request::{Endpoint, RequestTemplate, Target},
};
use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::path::Path;

impl ApiSettings {
    pub fn from_yaml(yml: &str) -> Result<Self> {
        serde_yaml::from_str(yml).context("Invalid yaml configuration")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yml = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read file {}", path.display()))?;
        Self::from_yaml(&yml).with_context(|| format!("Could not load {}", path.display()))
    }

    pub fn target(&self) -> Result<Target> {
        Target::new(&self.name, &self.url)
            .with_context(|| format!("Invalid url for {}: {}", self.name, self.url))
    }

    /// Build every declared endpoint, bound to the manifest's target
    pub fn endpoints(&self) -> Result<Vec<Endpoint>> {
        let target = self.target()?;
        let mut names = HashSet::new();
        let mut endpoints = Vec::with_capacity(self.endpoints.len());

        for settings in &self.endpoints {
            if !names.insert(settings.name.as_str()) {
                bail!("Duplicate endpoint: {}", settings.name);
            }
            let template = self
                .request_template(settings)
                .with_context(|| format!("Invalid endpoint {}", settings.name))?;
            endpoints.push(Endpoint::new(&settings.name, &template, &target)?);
        }
        Ok(endpoints)
    }

    pub fn endpoint(&self, name: &str) -> Result<Endpoint> {
        self.endpoints()?
            .into_iter()
            .find(|endpoint| endpoint.name() == name)
            .with_context(|| format!("Unknown endpoint: {}", name))
    }

    fn request_template(&self, settings: &EndpointSettings) -> Result<RequestTemplate> {
        let mut template = RequestTemplate::new()
            .charset(self.charset.unwrap_or_default())
            .decode_slash(self.decode_slash)
            .collection_format(self.collection_format.unwrap_or_default())
            .method(settings.method);

        if !settings.path.is_empty() {
            template = template.uri(&settings.path)?;
        }
        for (name, values) in &settings.query {
            template = template.query(name, values.as_slice())?;
        }
        for (name, values) in &settings.headers {
            template = template.header(name, values.as_slice())?;
        }
        if let Some(body) = &settings.body {
            template = template.body_template(body)?;
        }
        Ok(template)
    }
}
