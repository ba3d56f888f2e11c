// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

/// Domain shared by every NIFCLOUD REST endpoint.
pub const API_DOMAIN: &str = "api.cloud.nifty.com";

/// Credential file read when nothing else is configured.
pub const DEFAULT_CONFIG_FILE: &str = "~/.nifcloud.yml";

/// Env value and config file key holding the access key id.
pub const ACCESS_KEY_ID: &str = "ACCESS_KEY_ID";
/// Env value and config file key holding the secret access key.
pub const SECRET_ACCESS_KEY: &str = "SECRET_ACCESS_KEY";

// Query parameters used by the query signatures.
pub(crate) const PARAM_ACCESS_KEY_ID: &str = "AccessKeyId";
pub(crate) const PARAM_ACTION: &str = "Action";
pub(crate) const PARAM_SIGNATURE: &str = "Signature";
pub(crate) const PARAM_SIGNATURE_METHOD: &str = "SignatureMethod";
pub(crate) const PARAM_SIGNATURE_VERSION: &str = "SignatureVersion";
pub(crate) const PARAM_TIMESTAMP: &str = "Timestamp";

/// Signature method selecting HMAC-SHA1 for signature version 2.
pub const HMAC_SHA1: &str = "HmacSHA1";
/// Default signature method of signature version 2.
pub const HMAC_SHA256: &str = "HmacSHA256";

/// Date header of signature version 4.
pub const X_AMZ_DATE: &str = "x-amz-date";
/// Algorithm name of signature version 4.
pub const V4_ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Content type of POST bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// AsciiSet for URI encoding of query keys and values.
///
/// - URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
pub static QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet for URI encoding of paths, same as [`QUERY_ENCODE_SET`] but keeps `/`.
pub static URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet for re-quoting a full url before it is parsed.
///
/// Reserved characters and existing `%XX` escapes are kept, space, control
/// characters and other bytes not allowed in a URI are encoded.
pub static REQUOTE_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'%')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b'/')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'?')
    .remove(b'@')
    .remove(b'[')
    .remove(b']');
