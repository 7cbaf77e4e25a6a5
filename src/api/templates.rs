//! HTML templates, embedded in the binary and parsed once at startup.

use minijinja::Environment;
use once_cell::sync::Lazy;
use rust_embed::RustEmbed;

use crate::error::Result;

#[derive(RustEmbed)]
#[folder = "templates/"]
struct Templates;

/// Shared template environment. Auto-escaping is on for `.html` names.
static ENV: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    for name in Templates::iter() {
        let file = Templates::get(&name).expect("embedded template listed but missing");
        let source =
            String::from_utf8(file.data.into_owned()).expect("embedded template is not UTF-8");
        env.add_template_owned(name.to_string(), source)
            .expect("embedded template failed to parse");
    }
    env
});

/// Render one template to a full HTML page.
pub fn render(name: &str, ctx: minijinja::Value) -> Result<String> {
    let template = ENV.get_template(name)?;
    Ok(template.render(ctx)?)
}
