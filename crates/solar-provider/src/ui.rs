use serde::Serialize;

/// 输入框类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HtmlInputType {
    Text,
    Number,
    Password,
    Checkbox,
}

/// 栅格宽度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HtmlWidth {
    Full,
    Half,
    Third,
}

/// 表单中的一个输入项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiInputElement {
    pub id: String,
    /// 绑定的 Setting 键
    pub name: String,
    pub input_type: HtmlInputType,
    pub column_width: HtmlWidth,
    pub required: bool,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_feedback: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UiInputElementBuilder {
    element: UiInputElement,
}

impl Default for UiInputElementBuilder {
    fn default() -> Self {
        Self {
            element: UiInputElement {
                id: String::new(),
                name: String::new(),
                input_type: HtmlInputType::Text,
                column_width: HtmlWidth::Full,
                required: false,
                label: String::new(),
                placeholder: None,
                tooltip: None,
                invalid_feedback: None,
            },
        }
    }
}

impl UiInputElementBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.element.id = id.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.element.name = name.into();
        self
    }

    pub fn with_type(mut self, input_type: HtmlInputType) -> Self {
        self.element.input_type = input_type;
        self
    }

    pub fn with_column_width(mut self, width: HtmlWidth) -> Self {
        self.element.column_width = width;
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.element.required = required;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.element.label = label.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.element.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.element.tooltip = Some(tooltip.into());
        self
    }

    pub fn with_invalid_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.element.invalid_feedback = Some(feedback.into());
        self
    }

    pub fn build(self) -> UiInputElement {
        self.element
    }
}

/// 有序的表单项列表，由 Host 渲染
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UiList {
    elements: Vec<UiInputElement>,
}

impl UiList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_element(&mut self, element: UiInputElement) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[UiInputElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
