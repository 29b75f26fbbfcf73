//! Mod authorship: teams and their members.

use crate::compare::is_trimmed_non_empty;
use crate::error::CatalogError;
use crate::json::{optional_string, put_optional, warn_unknown_properties};
use crate::xml::XmlElement;
use serde_json::{Map, Value};

const TEAM_JSON_PROPERTIES: &[&str] = &["name", "website", "members"];
const MEMBER_JSON_PROPERTIES: &[&str] = &["name", "alias", "website", "email"];
const TEAM_XML_ATTRIBUTES: &[&str] = &["name", "website"];
const MEMBER_XML_ATTRIBUTES: &[&str] = &["name", "alias", "website", "email"];

pub(crate) const XML_TEAM_ELEMENT_NAME: &str = "team";
pub(crate) const XML_MEMBER_ELEMENT_NAME: &str = "member";

/// One person credited on a mod.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModTeamMember {
    pub name: String,
    pub alias: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
}

impl ModTeamMember {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn is_valid(&self) -> bool {
        is_trimmed_non_empty(&self.name)
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();

        object.insert("name".to_string(), Value::String(self.name.clone()));
        put_optional(&mut object, "alias", self.alias.as_deref());
        put_optional(&mut object, "website", self.website.as_deref());
        put_optional(&mut object, "email", self.email.as_deref());

        Value::Object(object)
    }

    pub fn from_json(value: &Value, path: &str) -> Result<Self, CatalogError> {
        let object = crate::json::as_object(value, path)?;

        warn_unknown_properties(object, MEMBER_JSON_PROPERTIES, path);

        Ok(Self {
            name: crate::json::require_non_empty_string(object, "name", path)?,
            alias: optional_string(object, "alias", path)?,
            website: optional_string(object, "website", path)?,
            email: optional_string(object, "email", path)?,
        })
    }

    pub fn to_xml(&self) -> XmlElement {
        XmlElement::new(XML_MEMBER_ELEMENT_NAME)
            .attribute("name", &self.name)
            .optional_attribute("alias", self.alias.as_deref())
            .optional_attribute("website", self.website.as_deref())
            .optional_attribute("email", self.email.as_deref())
    }

    pub fn from_xml(element: &XmlElement, path: &str) -> Result<Self, CatalogError> {
        if element.name != XML_MEMBER_ELEMENT_NAME {
            return Err(CatalogError::schema(
                path,
                format!(
                    "expected '{XML_MEMBER_ELEMENT_NAME}' element, found '{}'",
                    element.name
                ),
            ));
        }

        element.warn_unknown_attributes(MEMBER_XML_ATTRIBUTES, path);

        Ok(Self {
            name: element.require_attribute("name", path)?,
            alias: element.attribute_value("alias").map(str::to_string),
            website: element.attribute_value("website").map(str::to_string),
            email: element.attribute_value("email").map(str::to_string),
        })
    }
}

impl std::fmt::Display for ModTeamMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;

        if let Some(alias) = &self.alias {
            write!(f, " \"{alias}\"")?;
        }

        Ok(())
    }
}

/// The team behind a mod: a display name plus ordered member credits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModTeam {
    pub name: String,
    pub website: Option<String>,
    pub members: Vec<ModTeamMember>,
}

impl ModTeam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn with_member(mut self, member: ModTeamMember) -> Self {
        self.members.push(member);
        self
    }

    /// A team with no name is valid when it still carries member credits.
    pub fn is_valid(&self) -> bool {
        (is_trimmed_non_empty(&self.name) || !self.members.is_empty())
            && self.members.iter().all(ModTeamMember::is_valid)
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();

        crate::json::put_non_empty(&mut object, "name", &self.name);
        put_optional(&mut object, "website", self.website.as_deref());

        if !self.members.is_empty() {
            object.insert(
                "members".to_string(),
                Value::Array(self.members.iter().map(ModTeamMember::to_json).collect()),
            );
        }

        Value::Object(object)
    }

    pub fn from_json(value: &Value, path: &str) -> Result<Self, CatalogError> {
        let object = crate::json::as_object(value, path)?;

        warn_unknown_properties(object, TEAM_JSON_PROPERTIES, path);

        let mut members = Vec::new();

        if let Some(members_value) = object.get("members") {
            let members_path = format!("{path}.members");

            for (index, member_value) in crate::json::as_array(members_value, &members_path)?
                .iter()
                .enumerate()
            {
                members.push(ModTeamMember::from_json(
                    member_value,
                    &format!("{members_path}[{index}]"),
                )?);
            }
        }

        Ok(Self {
            name: optional_string(object, "name", path)?.unwrap_or_default(),
            website: optional_string(object, "website", path)?,
            members,
        })
    }

    pub fn to_xml(&self) -> XmlElement {
        let mut element = XmlElement::new(XML_TEAM_ELEMENT_NAME);

        if !self.name.is_empty() {
            element = element.attribute("name", &self.name);
        }

        element = element.optional_attribute("website", self.website.as_deref());

        for member in &self.members {
            element.children.push(member.to_xml());
        }

        element
    }

    pub fn from_xml(element: &XmlElement, path: &str) -> Result<Self, CatalogError> {
        if element.name != XML_TEAM_ELEMENT_NAME {
            return Err(CatalogError::schema(
                path,
                format!(
                    "expected '{XML_TEAM_ELEMENT_NAME}' element, found '{}'",
                    element.name
                ),
            ));
        }

        element.warn_unknown_attributes(TEAM_XML_ATTRIBUTES, path);

        let mut members = Vec::new();

        for (index, child) in element.children_named(XML_MEMBER_ELEMENT_NAME).enumerate() {
            members.push(ModTeamMember::from_xml(
                child,
                &format!("{path}.member[{index}]"),
            )?);
        }

        Ok(Self {
            name: element.attribute_value("name").unwrap_or_default().to_string(),
            website: element.attribute_value("website").map(str::to_string),
            members,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ModTeam {
        ModTeam::new("Simply Silly Software")
            .with_website("https://www.sillysoftware.example")
            .with_member(ModTeamMember::new("Charlie Wiederhold"))
            .with_member(ModTeamMember::new("Matthias Worch").with_alias("Langsuyar"))
    }

    #[test]
    fn validity() {
        assert!(sample().is_valid());
        assert!(
            ModTeam::new("").with_member(ModTeamMember::new("Solo")).is_valid(),
            "nameless team with members is valid"
        );
        assert!(!ModTeam::new("").is_valid());
        assert!(!ModTeam::new("T").with_member(ModTeamMember::new("")).is_valid());
    }

    #[test]
    fn json_round_trip() {
        let team = sample();
        assert_eq!(team, ModTeam::from_json(&team.to_json(), "team").unwrap());
    }

    #[test]
    fn xml_round_trip() {
        let team = sample();
        assert_eq!(team, ModTeam::from_xml(&team.to_xml(), "team").unwrap());
    }

    #[test]
    fn member_display_includes_alias() {
        let member = ModTeamMember::new("Matthias Worch").with_alias("Langsuyar");
        assert_eq!(member.to_string(), "Matthias Worch \"Langsuyar\"");
    }
}
