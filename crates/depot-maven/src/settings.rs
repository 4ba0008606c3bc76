//! `settings.xml` serialization for the deploy executor.

use std::path::PathBuf;

use depot_core::settings::{MavenSettings, Server};
use depot_util::errors::DepotError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// Render settings as a Maven `settings.xml` document.
///
/// The output is fully determined by `settings`: element order is fixed and
/// optional values are omitted rather than written empty.
pub fn settings_xml(settings: &MavenSettings) -> miette::Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    emit(&mut writer, Event::Start(BytesStart::new("settings")))?;

    if let Some(ref repo) = settings.local_repository {
        text_element(&mut writer, "localRepository", &repo.to_string_lossy())?;
    }
    text_element(
        &mut writer,
        "interactiveMode",
        bool_text(settings.interactive_mode),
    )?;
    text_element(&mut writer, "offline", bool_text(settings.offline))?;

    if !settings.servers.is_empty() {
        emit(&mut writer, Event::Start(BytesStart::new("servers")))?;
        for server in &settings.servers {
            emit(&mut writer, Event::Start(BytesStart::new("server")))?;
            text_element(&mut writer, "id", &server.id)?;
            if let Some(ref username) = server.username {
                text_element(&mut writer, "username", username)?;
            }
            if let Some(ref password) = server.password {
                text_element(&mut writer, "password", password)?;
            }
            emit(&mut writer, Event::End(BytesEnd::new("server")))?;
        }
        emit(&mut writer, Event::End(BytesEnd::new("servers")))?;
    }

    emit(&mut writer, Event::End(BytesEnd::new("settings")))?;

    let mut xml = String::from_utf8(writer.into_inner()).map_err(|e| DepotError::Settings {
        message: format!("settings.xml is not valid UTF-8: {e}"),
    })?;
    xml.push('\n');
    Ok(xml)
}

fn bool_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> miette::Result<()> {
    writer.write_event(event).map_err(|e| DepotError::Settings {
        message: format!("Failed to write settings.xml: {e}"),
    })?;
    Ok(())
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &str) -> miette::Result<()> {
    emit(writer, Event::Start(BytesStart::new(name)))?;
    emit(writer, Event::Text(BytesText::new(value)))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}

/// Parse a `settings.xml` document back into settings.
///
/// Elements this crate does not write are ignored.
pub fn parse_settings_xml(xml: &str) -> miette::Result<MavenSettings> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut settings = MavenSettings::default();
    let mut path: Vec<String> = Vec::new();
    let mut text_buf = String::new();
    let mut current_server: Option<Server> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                path.push(tag);
                if path.join(">") == "settings>servers>server" {
                    current_server = Some(Server {
                        id: String::new(),
                        username: None,
                        password: None,
                    });
                }
                text_buf.clear();
            }
            Ok(Event::Text(ref e)) => {
                text_buf = e.unescape().unwrap_or_default().to_string();
            }
            Ok(Event::End(_)) => {
                let ctx = path.join(">");
                match ctx.as_str() {
                    "settings>localRepository" => {
                        settings.local_repository = Some(PathBuf::from(&text_buf));
                    }
                    "settings>interactiveMode" => {
                        settings.interactive_mode = text_buf == "true";
                    }
                    "settings>offline" => settings.offline = text_buf == "true",
                    "settings>servers>server>id" => {
                        if let Some(ref mut server) = current_server {
                            server.id = text_buf.clone();
                        }
                    }
                    "settings>servers>server>username" => {
                        if let Some(ref mut server) = current_server {
                            server.username = Some(text_buf.clone());
                        }
                    }
                    "settings>servers>server>password" => {
                        if let Some(ref mut server) = current_server {
                            server.password = Some(text_buf.clone());
                        }
                    }
                    "settings>servers>server" => {
                        if let Some(server) = current_server.take() {
                            settings.servers.push(server);
                        }
                    }
                    _ => {}
                }
                path.pop();
                text_buf.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DepotError::Settings {
                    message: format!("Failed to parse settings.xml: {e}"),
                }
                .into());
            }
            _ => {}
        }
    }

    Ok(settings)
}
