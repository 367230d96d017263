//! Built-in cloud provider descriptors.

use super::{CloudProviderDescriptor, PanelField, ProviderPanel, TabHead};
use crate::models::server::{Protocol, ServerParams, ServerType};

const USERNAME: PanelField = PanelField {
    name: "username",
    label: "Username",
    secret: false,
};

const ACCESS_KEY: PanelField = PanelField {
    name: "accessKey",
    label: "Access Key",
    secret: true,
};

const API_TOKEN: PanelField = PanelField {
    name: "accessKey",
    label: "API Token",
    secret: true,
};

const HOST: PanelField = PanelField {
    name: "host",
    label: "Host",
    secret: false,
};

const USER_AND_KEY: &[PanelField] = &[USERNAME, ACCESS_KEY];
const HOST_AND_TOKEN: &[PanelField] = &[HOST, API_TOKEN];
const TOKEN_ONLY: &[PanelField] = &[API_TOKEN];

fn hosted_panel(
    key: &str,
    host: &str,
    path: &str,
    fields: &'static [PanelField],
) -> ProviderPanel {
    ProviderPanel {
        defaults: ServerParams {
            server_type: ServerType::Provider(key.to_owned()),
            host: host.to_owned(),
            port: Some(443),
            path: path.to_owned(),
            protocol: Protocol::Https,
            auth: None,
        },
        fields,
    }
}

macro_rules! provider {
    ($key:literal, $label:literal, $host:literal, $path:literal, $fields:expr) => {{
        fn tab_head() -> TabHead {
            TabHead { label: $label }
        }
        fn panel() -> ProviderPanel {
            hosted_panel($key, $host, $path, $fields)
        }
        CloudProviderDescriptor {
            key: $key,
            tab_head,
            panel,
        }
    }};
}

/// Providers offered in the selection surface, in display order.
pub static BUILTIN_PROVIDERS: &[CloudProviderDescriptor] = &[
    provider!(
        "sauce",
        "Sauce Labs",
        "ondemand.us-west-1.saucelabs.com",
        "/wd/hub",
        USER_AND_KEY
    ),
    provider!("headspin", "HeadSpin", "", "/v0/{token}/wd/hub", HOST_AND_TOKEN),
    provider!(
        "browserstack",
        "BrowserStack",
        "hub-cloud.browserstack.com",
        "/wd/hub",
        USER_AND_KEY
    ),
    provider!(
        "lambdatest",
        "LambdaTest",
        "mobile-hub.lambdatest.com",
        "/wd/hub",
        USER_AND_KEY
    ),
    provider!("bitbar", "BitBar", "appium.bitbar.com", "/wd/hub", TOKEN_ONLY),
    provider!("kobiton", "Kobiton", "api.kobiton.com", "/wd/hub", USER_AND_KEY),
    provider!(
        "perfecto",
        "Perfecto",
        "",
        "/nexperience/perfectomobile/wd/hub",
        HOST_AND_TOKEN
    ),
    provider!("pcloudy", "pCloudy", "", "/objectspy/wd/hub", USER_AND_KEY),
    provider!(
        "testingbot",
        "TestingBot",
        "hub.testingbot.com",
        "/wd/hub",
        USER_AND_KEY
    ),
    provider!("experitest", "Experitest", "", "/wd/hub", HOST_AND_TOKEN),
];
