// Copyright (c) The Plinth Authors. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Helpers for CloudFormation intrinsic functions.
//!
//! Every helper returns a plain `serde_json::Value`, so the result can be
//! embedded anywhere in a rendered resource description.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const AWS_PARTITION: &str = "AWS::Partition";
pub const AWS_REGION: &str = "AWS::Region";
pub const AWS_ACCOUNT_ID: &str = "AWS::AccountId";

/// An opaque reference to a value that is only known at deploy time,
/// such as a bucket name, a template parameter or a resource attribute.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(transparent)]
pub struct Reference(Value);

impl Reference {
    /// A literal value, e.g. the name of a bucket created outside the template.
    pub fn literal(value: impl Into<String>) -> Self {
        Reference(Value::String(value.into()))
    }

    /// `{"Ref": name}` to a parameter or resource of the same template.
    pub fn to(name: impl Into<String>) -> Self {
        Reference(reference(name))
    }

    /// `{"Fn::GetAtt": [logical_id, attribute]}`
    pub fn attribute(logical_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Reference(get_att(logical_id, attribute))
    }

    #[inline]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    #[inline]
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Reference> for Value {
    fn from(reference: Reference) -> Self {
        reference.0
    }
}

#[inline]
pub fn reference(name: impl Into<String>) -> Value {
    json!({ "Ref": name.into() })
}

#[inline]
pub fn get_att(logical_id: impl Into<String>, attribute: impl Into<String>) -> Value {
    json!({ "Fn::GetAtt": [logical_id.into(), attribute.into()] })
}

#[inline]
pub fn join(delimiter: &str, parts: Vec<Value>) -> Value {
    json!({ "Fn::Join": [delimiter, parts] })
}

#[inline]
pub fn select(index: usize, list: Value) -> Value {
    json!({ "Fn::Select": [index, list] })
}

#[inline]
pub fn split(delimiter: &str, source: Value) -> Value {
    json!({ "Fn::Split": [delimiter, source] })
}

/// Returns the ARN of an S3 bucket, built from the partition pseudo parameter.
pub fn bucket_arn(bucket: &Reference) -> Value {
    join("", vec![json!("arn:"), reference(AWS_PARTITION), json!(":s3:::"), bucket.as_value().clone()])
}
