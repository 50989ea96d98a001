//! Canonical names of the builtin expression types.
//!
//! Aliases (`add`, `equals`, ...) resolve to these names; a node's type is
//! always the canonical one.

// Math
pub const ADD: &str = "+";
pub const SUBTRACT: &str = "-";
pub const MULTIPLY: &str = "*";
pub const DIVIDE: &str = "/";
pub const MOD: &str = "%";
pub const POWER: &str = "^";
pub const MIN: &str = "min";
pub const MAX: &str = "max";
pub const AVERAGE: &str = "average";
pub const SUM: &str = "sum";
pub const RANGE: &str = "range";
pub const FLOOR: &str = "floor";
pub const CEILING: &str = "ceiling";
pub const ROUND: &str = "round";
pub const ABS: &str = "abs";
pub const SQRT: &str = "sqrt";
pub const RAND: &str = "rand";

// Comparisons
pub const LESS_THAN: &str = "<";
pub const LESS_THAN_OR_EQUAL: &str = "<=";
pub const EQUAL: &str = "==";
pub const NOT_EQUAL: &str = "!=";
pub const GREATER_THAN: &str = ">";
pub const GREATER_THAN_OR_EQUAL: &str = ">=";
pub const EXISTS: &str = "exists";

// Logic
pub const AND: &str = "&&";
pub const OR: &str = "||";
pub const NOT: &str = "!";
pub const IF: &str = "if";
pub const COALESCE: &str = "coalesce";
pub const OPTIONAL: &str = "optional";
pub const IGNORE: &str = "ignore";

// String
pub const CONCAT: &str = "concat";
pub const LENGTH: &str = "length";
pub const REPLACE: &str = "replace";
pub const REPLACE_IGNORE_CASE: &str = "replaceIgnoreCase";
pub const SPLIT: &str = "split";
pub const SUBSTRING: &str = "substring";
pub const TO_LOWER: &str = "toLower";
pub const TO_UPPER: &str = "toUpper";
pub const TRIM: &str = "trim";
pub const ENDS_WITH: &str = "endsWith";
pub const STARTS_WITH: &str = "startsWith";
pub const COUNT_WORD: &str = "countWord";
pub const ADD_ORDINAL: &str = "addOrdinal";
pub const NEW_GUID: &str = "newGuid";
pub const INDEX_OF: &str = "indexOf";
pub const LAST_INDEX_OF: &str = "lastIndexOf";
pub const EOL: &str = "EOL";
pub const SENTENCE_CASE: &str = "sentenceCase";
pub const TITLE_CASE: &str = "titleCase";

// Collection
pub const COUNT: &str = "count";
pub const CONTAINS: &str = "contains";
pub const EMPTY: &str = "empty";
pub const JOIN: &str = "join";
pub const FIRST: &str = "first";
pub const LAST: &str = "last";
pub const FOREACH: &str = "foreach";
pub const SELECT: &str = "select";
pub const WHERE: &str = "where";
pub const UNION: &str = "union";
pub const INTERSECTION: &str = "intersection";
pub const SKIP: &str = "skip";
pub const TAKE: &str = "take";
pub const SUB_ARRAY: &str = "subArray";
pub const SORT_BY: &str = "sortBy";
pub const SORT_BY_DESCENDING: &str = "sortByDescending";
pub const INDICES_AND_VALUES: &str = "indicesAndValues";
pub const FLATTEN: &str = "flatten";
pub const UNIQUE: &str = "unique";
pub const REVERSE: &str = "reverse";
pub const ANY: &str = "any";
pub const ALL: &str = "all";
pub const CREATE_ARRAY: &str = "createArray";

// Date and time
pub const ADD_DAYS: &str = "addDays";
pub const ADD_HOURS: &str = "addHours";
pub const ADD_MINUTES: &str = "addMinutes";
pub const ADD_SECONDS: &str = "addSeconds";
pub const ADD_TO_TIME: &str = "addToTime";
pub const SUBTRACT_FROM_TIME: &str = "subtractFromTime";
pub const DAY_OF_MONTH: &str = "dayOfMonth";
pub const DAY_OF_WEEK: &str = "dayOfWeek";
pub const DAY_OF_YEAR: &str = "dayOfYear";
pub const MONTH: &str = "month";
pub const YEAR: &str = "year";
pub const DATE: &str = "date";
pub const FORMAT_DATE_TIME: &str = "formatDateTime";
pub const FORMAT_EPOCH: &str = "formatEpoch";
pub const FORMAT_TICKS: &str = "formatTicks";
pub const UTC_NOW: &str = "utcNow";
pub const GET_FUTURE_TIME: &str = "getFutureTime";
pub const GET_PAST_TIME: &str = "getPastTime";
pub const START_OF_DAY: &str = "startOfDay";
pub const START_OF_HOUR: &str = "startOfHour";
pub const START_OF_MONTH: &str = "startOfMonth";
pub const TICKS: &str = "ticks";
pub const TICKS_TO_DAYS: &str = "ticksToDays";
pub const TICKS_TO_HOURS: &str = "ticksToHours";
pub const TICKS_TO_MINUTES: &str = "ticksToMinutes";
pub const DATE_TIME_DIFF: &str = "dateTimeDiff";
pub const DATE_READ_BACK: &str = "dateReadBack";
pub const GET_TIME_OF_DAY: &str = "getTimeOfDay";
pub const CONVERT_FROM_UTC: &str = "convertFromUTC";
pub const CONVERT_TO_UTC: &str = "convertToUTC";

// Conversion
pub const FLOAT: &str = "float";
pub const INT: &str = "int";
pub const STRING: &str = "string";
pub const BOOL: &str = "bool";
pub const BINARY: &str = "binary";
pub const BASE64: &str = "base64";
pub const BASE64_TO_BINARY: &str = "base64ToBinary";
pub const BASE64_TO_STRING: &str = "base64ToString";
pub const DATA_URI: &str = "dataUri";
pub const DATA_URI_TO_BINARY: &str = "dataUriToBinary";
pub const DATA_URI_TO_STRING: &str = "dataUriToString";
pub const URI_COMPONENT: &str = "uriComponent";
pub const URI_COMPONENT_TO_STRING: &str = "uriComponentToString";
pub const JSON: &str = "json";
pub const JSON_STRINGIFY: &str = "jsonStringify";
pub const FORMAT_NUMBER: &str = "formatNumber";
pub const STRING_OR_VALUE: &str = "stringOrValue";

// URI parsing
pub const URI_HOST: &str = "uriHost";
pub const URI_PATH: &str = "uriPath";
pub const URI_PATH_AND_QUERY: &str = "uriPathAndQuery";
pub const URI_PORT: &str = "uriPort";
pub const URI_QUERY: &str = "uriQuery";
pub const URI_SCHEME: &str = "uriScheme";

// Memory and objects
pub const ACCESSOR: &str = "Accessor";
pub const ELEMENT: &str = "Element";
pub const CONSTANT: &str = "Constant";
pub const LAMBDA: &str = "Lambda";
pub const GET_PROPERTY: &str = "getProperty";
pub const ADD_PROPERTY: &str = "addProperty";
pub const SET_PROPERTY: &str = "setProperty";
pub const REMOVE_PROPERTY: &str = "removeProperty";
pub const SET_PATH_TO_VALUE: &str = "setPathToValue";
pub const MERGE: &str = "merge";
pub const JPATH: &str = "jPath";

// Type predicates
pub const IS_MATCH: &str = "isMatch";
pub const IS_INTEGER: &str = "isInteger";
pub const IS_FLOAT: &str = "isFloat";
pub const IS_STRING: &str = "isString";
pub const IS_ARRAY: &str = "isArray";
pub const IS_OBJECT: &str = "isObject";
pub const IS_BOOLEAN: &str = "isBoolean";
pub const IS_DATE_TIME: &str = "isDateTime";
