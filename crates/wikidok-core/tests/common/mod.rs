//! Handlers shared by the integration test suites
#![allow(dead_code)]

use wikidok_core::{Element, FunctionCall, FunctionHandler, Markup};

/// Uppercases its arguments
pub struct Upper;

impl FunctionHandler for Upper {
    fn to_text(&self, call: &FunctionCall) -> anyhow::Result<String> {
        Ok(call.args.join(" ").to_uppercase())
    }

    fn to_element(&self, call: &FunctionCall) -> anyhow::Result<Markup> {
        Ok(Markup::Element(
            Element::new("span").text(call.args.join(" ").to_uppercase()),
        ))
    }
}

/// Always fails, for exercising handler error propagation
pub struct Failing;

impl FunctionHandler for Failing {
    fn to_text(&self, _call: &FunctionCall) -> anyhow::Result<String> {
        anyhow::bail!("handler exploded")
    }

    fn to_element(&self, _call: &FunctionCall) -> anyhow::Result<Markup> {
        anyhow::bail!("handler exploded")
    }
}
