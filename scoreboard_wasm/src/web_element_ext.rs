use crate::web_document::web_document;
use crate::web_error_handling::JsResult;


pub trait WebElementExt {
    fn with_id(self, value: &str) -> web_sys::Element;
    fn with_text_content(self, text: &str) -> web_sys::Element;
    fn with_attribute(self, name: &str, value: &str) -> JsResult<web_sys::Element>;
    fn with_classes<'a>(self, classes: impl IntoIterator<Item = &'a str>) -> JsResult<web_sys::Element>;

    fn remove_all_children(&self);
    fn append_new_element(&self, local_name: &str) -> JsResult<web_sys::Element>;
}

impl WebElementExt for web_sys::Element {
    fn with_id(self, value: &str) -> web_sys::Element {
        self.set_id(value);
        self
    }

    fn with_text_content(self, text: &str) -> web_sys::Element {
        self.set_text_content(Some(text));
        self
    }

    fn with_attribute(self, name: &str, value: &str) -> JsResult<web_sys::Element> {
        self.set_attribute(name, value)?;
        Ok(self)
    }

    fn with_classes<'a>(self, classes: impl IntoIterator<Item = &'a str>) -> JsResult<web_sys::Element> {
        let class_list = self.class_list();
        for class in classes {
            class_list.add_1(class)?;
        }
        Ok(self)
    }

    fn remove_all_children(&self) {
        while let Some(child) = self.last_child() {
            // Cannot fail: `child` is a child of `self`.
            let _ = self.remove_child(&child);
        }
    }

    fn append_new_element(&self, local_name: &str) -> JsResult<web_sys::Element> {
        let child = web_document()?.create_element(local_name)?;
        self.append_child(&child)?;
        Ok(child)
    }
}
