//! UI Automation identifiers: control types, patterns and properties
//!
//! Identifiers carry their stable UIA integer ids so snapshots produced by a
//! capture layer can be mapped without string matching.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Control type of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ControlType {
    Button,
    Calendar,
    CheckBox,
    ComboBox,
    Edit,
    Hyperlink,
    Image,
    ListItem,
    List,
    Menu,
    MenuBar,
    MenuItem,
    ProgressBar,
    RadioButton,
    ScrollBar,
    Slider,
    Spinner,
    StatusBar,
    Tab,
    TabItem,
    Text,
    ToolBar,
    ToolTip,
    Tree,
    TreeItem,
    Custom,
    Group,
    Thumb,
    DataGrid,
    DataItem,
    Document,
    SplitButton,
    Window,
    Pane,
    Header,
    HeaderItem,
    Table,
    TitleBar,
    Separator,
    SemanticZoom,
    AppBar,
}

impl ControlType {
    /// Every control type, in UIA id order
    pub const ALL: [ControlType; 41] = [
        ControlType::Button,
        ControlType::Calendar,
        ControlType::CheckBox,
        ControlType::ComboBox,
        ControlType::Edit,
        ControlType::Hyperlink,
        ControlType::Image,
        ControlType::ListItem,
        ControlType::List,
        ControlType::Menu,
        ControlType::MenuBar,
        ControlType::MenuItem,
        ControlType::ProgressBar,
        ControlType::RadioButton,
        ControlType::ScrollBar,
        ControlType::Slider,
        ControlType::Spinner,
        ControlType::StatusBar,
        ControlType::Tab,
        ControlType::TabItem,
        ControlType::Text,
        ControlType::ToolBar,
        ControlType::ToolTip,
        ControlType::Tree,
        ControlType::TreeItem,
        ControlType::Custom,
        ControlType::Group,
        ControlType::Thumb,
        ControlType::DataGrid,
        ControlType::DataItem,
        ControlType::Document,
        ControlType::SplitButton,
        ControlType::Window,
        ControlType::Pane,
        ControlType::Header,
        ControlType::HeaderItem,
        ControlType::Table,
        ControlType::TitleBar,
        ControlType::Separator,
        ControlType::SemanticZoom,
        ControlType::AppBar,
    ];

    /// UIA control type id (`UIA_ButtonControlTypeId` = 50000, ...)
    pub fn id(self) -> i32 {
        // ALL is declared in id order starting at 50000
        50000 + self as i32
    }

    /// Look up a control type by its UIA id
    pub fn from_id(id: i32) -> Option<Self> {
        let offset = usize::try_from(id.checked_sub(50000)?).ok()?;
        Self::ALL.get(offset).copied()
    }

    /// Name as used in UIA documentation
    pub fn name(self) -> &'static str {
        match self {
            ControlType::Button => "Button",
            ControlType::Calendar => "Calendar",
            ControlType::CheckBox => "CheckBox",
            ControlType::ComboBox => "ComboBox",
            ControlType::Edit => "Edit",
            ControlType::Hyperlink => "Hyperlink",
            ControlType::Image => "Image",
            ControlType::ListItem => "ListItem",
            ControlType::List => "List",
            ControlType::Menu => "Menu",
            ControlType::MenuBar => "MenuBar",
            ControlType::MenuItem => "MenuItem",
            ControlType::ProgressBar => "ProgressBar",
            ControlType::RadioButton => "RadioButton",
            ControlType::ScrollBar => "ScrollBar",
            ControlType::Slider => "Slider",
            ControlType::Spinner => "Spinner",
            ControlType::StatusBar => "StatusBar",
            ControlType::Tab => "Tab",
            ControlType::TabItem => "TabItem",
            ControlType::Text => "Text",
            ControlType::ToolBar => "ToolBar",
            ControlType::ToolTip => "ToolTip",
            ControlType::Tree => "Tree",
            ControlType::TreeItem => "TreeItem",
            ControlType::Custom => "Custom",
            ControlType::Group => "Group",
            ControlType::Thumb => "Thumb",
            ControlType::DataGrid => "DataGrid",
            ControlType::DataItem => "DataItem",
            ControlType::Document => "Document",
            ControlType::SplitButton => "SplitButton",
            ControlType::Window => "Window",
            ControlType::Pane => "Pane",
            ControlType::Header => "Header",
            ControlType::HeaderItem => "HeaderItem",
            ControlType::Table => "Table",
            ControlType::TitleBar => "TitleBar",
            ControlType::Separator => "Separator",
            ControlType::SemanticZoom => "SemanticZoom",
            ControlType::AppBar => "AppBar",
        }
    }
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ControlType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown control type: {}", s))
    }
}

/// Interaction pattern an element supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PatternId {
    Invoke,
    Selection,
    Value,
    RangeValue,
    Scroll,
    ExpandCollapse,
    Grid,
    GridItem,
    MultipleView,
    Window,
    SelectionItem,
    Dock,
    Table,
    TableItem,
    Text,
    Toggle,
    Transform,
    ScrollItem,
    LegacyIAccessible,
    ItemContainer,
    VirtualizedItem,
}

impl PatternId {
    /// Every pattern, in UIA id order
    pub const ALL: [PatternId; 21] = [
        PatternId::Invoke,
        PatternId::Selection,
        PatternId::Value,
        PatternId::RangeValue,
        PatternId::Scroll,
        PatternId::ExpandCollapse,
        PatternId::Grid,
        PatternId::GridItem,
        PatternId::MultipleView,
        PatternId::Window,
        PatternId::SelectionItem,
        PatternId::Dock,
        PatternId::Table,
        PatternId::TableItem,
        PatternId::Text,
        PatternId::Toggle,
        PatternId::Transform,
        PatternId::ScrollItem,
        PatternId::LegacyIAccessible,
        PatternId::ItemContainer,
        PatternId::VirtualizedItem,
    ];

    /// UIA pattern id (`UIA_InvokePatternId` = 10000, ...)
    pub fn id(self) -> i32 {
        10000 + self as i32
    }

    /// Look up a pattern by its UIA id
    pub fn from_id(id: i32) -> Option<Self> {
        let offset = usize::try_from(id.checked_sub(10000)?).ok()?;
        Self::ALL.get(offset).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            PatternId::Invoke => "Invoke",
            PatternId::Selection => "Selection",
            PatternId::Value => "Value",
            PatternId::RangeValue => "RangeValue",
            PatternId::Scroll => "Scroll",
            PatternId::ExpandCollapse => "ExpandCollapse",
            PatternId::Grid => "Grid",
            PatternId::GridItem => "GridItem",
            PatternId::MultipleView => "MultipleView",
            PatternId::Window => "Window",
            PatternId::SelectionItem => "SelectionItem",
            PatternId::Dock => "Dock",
            PatternId::Table => "Table",
            PatternId::TableItem => "TableItem",
            PatternId::Text => "Text",
            PatternId::Toggle => "Toggle",
            PatternId::Transform => "Transform",
            PatternId::ScrollItem => "ScrollItem",
            PatternId::LegacyIAccessible => "LegacyIAccessible",
            PatternId::ItemContainer => "ItemContainer",
            PatternId::VirtualizedItem => "VirtualizedItem",
        }
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Property identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PropertyId {
    RuntimeId,
    BoundingRectangle,
    ProcessId,
    ControlType,
    LocalizedControlType,
    Name,
    AcceleratorKey,
    AccessKey,
    HasKeyboardFocus,
    IsKeyboardFocusable,
    IsEnabled,
    AutomationId,
    ClassName,
    HelpText,
    IsControlElement,
    IsContentElement,
    LabeledBy,
    IsPassword,
    NativeWindowHandle,
    ItemType,
    IsOffscreen,
    Orientation,
    FrameworkId,
    IsRequiredForForm,
    ItemStatus,
    HeadingLevel,
}

impl PropertyId {
    /// UIA property id (`UIA_NamePropertyId` = 30005, ...)
    pub fn id(self) -> i32 {
        match self {
            PropertyId::RuntimeId => 30000,
            PropertyId::BoundingRectangle => 30001,
            PropertyId::ProcessId => 30002,
            PropertyId::ControlType => 30003,
            PropertyId::LocalizedControlType => 30004,
            PropertyId::Name => 30005,
            PropertyId::AcceleratorKey => 30006,
            PropertyId::AccessKey => 30007,
            PropertyId::HasKeyboardFocus => 30008,
            PropertyId::IsKeyboardFocusable => 30009,
            PropertyId::IsEnabled => 30010,
            PropertyId::AutomationId => 30011,
            PropertyId::ClassName => 30012,
            PropertyId::HelpText => 30013,
            PropertyId::IsControlElement => 30016,
            PropertyId::IsContentElement => 30017,
            PropertyId::LabeledBy => 30018,
            PropertyId::IsPassword => 30019,
            PropertyId::NativeWindowHandle => 30020,
            PropertyId::ItemType => 30021,
            PropertyId::IsOffscreen => 30022,
            PropertyId::Orientation => 30023,
            PropertyId::FrameworkId => 30024,
            PropertyId::IsRequiredForForm => 30025,
            PropertyId::ItemStatus => 30026,
            PropertyId::HeadingLevel => 30173,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PropertyId::RuntimeId => "RuntimeId",
            PropertyId::BoundingRectangle => "BoundingRectangle",
            PropertyId::ProcessId => "ProcessId",
            PropertyId::ControlType => "ControlType",
            PropertyId::LocalizedControlType => "LocalizedControlType",
            PropertyId::Name => "Name",
            PropertyId::AcceleratorKey => "AcceleratorKey",
            PropertyId::AccessKey => "AccessKey",
            PropertyId::HasKeyboardFocus => "HasKeyboardFocus",
            PropertyId::IsKeyboardFocusable => "IsKeyboardFocusable",
            PropertyId::IsEnabled => "IsEnabled",
            PropertyId::AutomationId => "AutomationId",
            PropertyId::ClassName => "ClassName",
            PropertyId::HelpText => "HelpText",
            PropertyId::IsControlElement => "IsControlElement",
            PropertyId::IsContentElement => "IsContentElement",
            PropertyId::LabeledBy => "LabeledBy",
            PropertyId::IsPassword => "IsPassword",
            PropertyId::NativeWindowHandle => "NativeWindowHandle",
            PropertyId::ItemType => "ItemType",
            PropertyId::IsOffscreen => "IsOffscreen",
            PropertyId::Orientation => "Orientation",
            PropertyId::FrameworkId => "FrameworkId",
            PropertyId::IsRequiredForForm => "IsRequiredForForm",
            PropertyId::ItemStatus => "ItemStatus",
            PropertyId::HeadingLevel => "HeadingLevel",
        }
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Screen rectangle in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build from origin and size
    pub fn from_size(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// True when the rectangle covers no area
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    pub fn is_all_zeros(&self) -> bool {
        *self == Rect::default()
    }

    /// True when `other` lies entirely inside this rectangle
    pub fn contains(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[l={},t={},r={},b={}]",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Typed property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
    Rect(Rect),
    ControlType(ControlType),
    Ids(Vec<i32>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_rect(&self) -> Option<Rect> {
        match self {
            Value::Rect(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_control_type(&self) -> Option<ControlType> {
        match self {
            Value::ControlType(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_ids(&self) -> Option<&[i32]> {
        match self {
            Value::Ids(ids) => Some(ids),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Str(s) => write!(f, "'{}'", s),
            Value::Rect(r) => write!(f, "{}", r),
            Value::ControlType(t) => write!(f, "{}", t),
            Value::Ids(ids) => {
                let parts: Vec<String> = ids.iter().map(|i| i.to_string()).collect();
                write!(f, "[{}]", parts.join(","))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Rect> for Value {
    fn from(r: Rect) -> Self {
        Value::Rect(r)
    }
}

impl From<ControlType> for Value {
    fn from(t: ControlType) -> Self {
        Value::ControlType(t)
    }
}

impl From<Vec<i32>> for Value {
    fn from(ids: Vec<i32>) -> Self {
        Value::Ids(ids)
    }
}
